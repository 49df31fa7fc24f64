pub mod checks;
pub mod cluster;
pub mod config;
pub mod context;
pub mod error;
pub mod images;
pub mod paths;
pub mod profile;
pub mod status;

#[macro_export]
macro_rules! exit {
    ($err:expr, $($arg:tt)*) => {
        {
            tracing::error!($($arg)*);
            anyhow::bail!($err)
        }
    };
}
