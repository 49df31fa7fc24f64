use std::{
    fmt::Display,
    time::{Duration, Instant},
};

use console::{style, StyledObject};

lazy_static::lazy_static! {
    pub static ref GREEN_TICK: StyledObject<&'static str> = style("✔").green();
    pub static ref RED_CROSS: StyledObject<&'static str> = style("✗").red();
}

pub const PROFILE: [&str; 2] = ["Could not load profile", "Profile loaded"];
pub const KUBERNETES: [&str; 2] = ["Kubernetes checkout missing", "Kubernetes checkout found"];
pub const PACKAGES: [&str; 2] = ["Missing packages", "Packages built"];
pub const IMAGES: [&str; 2] = ["Missing images", "Images built"];

/// Runs `f`, printing a tick with `msgs[1]` on success or a cross with
/// `msgs[0]` on failure. `context` is shown next to the message.
pub fn step<T, E: Display>(
    msgs: [&str; 2],
    context: &str,
    f: impl FnOnce() -> Result<T, E>,
) -> Result<T, E> {
    let start_time = Instant::now();
    let result = f();
    let dur = start_time.elapsed();
    match &result {
        Ok(_) => println!(
            "{} {} ({}) took, {}",
            GREEN_TICK.to_string(),
            msgs[1],
            context,
            elapsed_time_str(&dur)
        ),
        Err(err) => {
            tracing::error!("{err}");
            println!("{} {} ({})", RED_CROSS.to_string(), msgs[0], context)
        }
    }
    result
}

fn elapsed_time_str(dur: &Duration) -> String {
    format!("{}.{:03}s", dur.as_secs(), dur.subsec_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_passes_result_through() {
        let ok: Result<u8, String> = step(PROFILE, "test", || Ok(3));
        assert_eq!(ok, Ok(3));
        let err: Result<u8, String> = step(PROFILE, "test", || Err("boom".to_owned()));
        assert_eq!(err, Err("boom".to_owned()));
    }

    #[test]
    fn elapsed_format() {
        assert_eq!(elapsed_time_str(&Duration::from_millis(1042)), "1.042s");
    }
}
