use std::{
    collections::HashSet,
    fmt,
    net::{IpAddr, SocketAddr},
    str::FromStr,
};

use serde::Serialize;
use tracing::debug;

use crate::{
    error::ConfigurationError,
    profile::{MachineProfile, Profile},
};

const ETCD_PEER_PORT: u16 = 2380;

/// Machine role. The declaration order is the role rank used for the
/// canonical machine order, so the derived `Ord` must not be reshuffled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    LoadBalancer,
    Master,
    Worker,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::LoadBalancer => "loadbalancer",
            Role::Master => "master",
            Role::Worker => "worker",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "loadbalancer" => Ok(Role::LoadBalancer),
            "master" => Ok(Role::Master),
            "worker" => Ok(Role::Worker),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Network {
    pub pod_subnet: String,
    pub service_subnet: String,
}

/// A machine of the cluster. It carries no reference to its cluster; use
/// [`Cluster::view`] to get at the derived properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Machine {
    pub name: String,
    pub role: Role,
    pub ip: IpAddr,
}

impl Machine {
    pub fn is_master(&self) -> bool {
        self.role == Role::Master
    }

    pub fn is_lb(&self) -> bool {
        self.role == Role::LoadBalancer
    }

    /// The address the machine advertises for cluster communication.
    pub fn advertise_address(&self) -> IpAddr {
        self.ip
    }

    fn etcd_peer(&self) -> String {
        format!(
            "{}=https://{}",
            self.name,
            SocketAddr::new(self.ip, ETCD_PEER_PORT)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    pub name: String,
    pub token: String,
    pub bootstrap: bool,
    pub network: Network,
    machines: Vec<Machine>,
}

impl Cluster {
    /// Builds the cluster described by `profile`, with its machines in
    /// canonical order: load balancers, then masters, then workers, each
    /// group keeping its input order.
    pub fn from_profile(profile: &Profile) -> Result<Self, ConfigurationError> {
        let cluster = profile
            .cluster
            .as_ref()
            .ok_or_else(|| missing("cluster"))?;
        let network = cluster
            .network
            .as_ref()
            .ok_or_else(|| missing("cluster.network"))?;
        let network = Network {
            pod_subnet: required(&network.pod_subnet, "cluster.network.pod_subnet")?,
            service_subnet: required(&network.service_subnet, "cluster.network.service_subnet")?,
        };

        let machines = profile
            .machines
            .as_ref()
            .ok_or_else(|| missing("machines"))?;
        let mut seen = HashSet::new();
        let mut ordered = machines
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let machine = machine_from_profile(i, m)?;
                if !seen.insert(machine.name.clone()) {
                    return Err(ConfigurationError::DuplicateMachine(machine.name));
                }
                Ok((machine.role, i, machine))
            })
            .collect::<Result<Vec<_>, _>>()?;
        ordered.sort_by_key(|(role, index, _)| (*role, *index));

        let cluster = Cluster {
            name: required(&cluster.name, "cluster.name")?,
            token: required(&cluster.token, "cluster.token")?,
            bootstrap: cluster
                .bootstrap
                .ok_or_else(|| missing("cluster.bootstrap"))?,
            network,
            machines: ordered.into_iter().map(|(_, _, m)| m).collect(),
        };
        debug!(
            "cluster {} machines in canonical order: {:?}",
            cluster.name,
            cluster.machines.iter().map(|m| &m.name).collect::<Vec<_>>()
        );
        Ok(cluster)
    }

    /// All machines in canonical order.
    pub fn machines(&self) -> &[Machine] {
        &self.machines
    }

    pub fn machine(&self, name: &str) -> Option<&Machine> {
        self.machines.iter().find(|m| m.name == name)
    }

    pub fn masters(&self) -> impl Iterator<Item = &Machine> + '_ {
        self.machines.iter().filter(|m| m.is_master())
    }

    /// The master that initializes the control plane.
    pub fn init_master(&self) -> Option<&Machine> {
        self.masters().next()
    }

    /// The first load balancer, if any.
    pub fn lb(&self) -> Option<&Machine> {
        self.machines.iter().find(|m| m.is_lb())
    }

    /// Masters and workers, without load balancers.
    pub fn cluster_machines(&self) -> impl Iterator<Item = &Machine> + '_ {
        self.machines.iter().filter(|m| !m.is_lb())
    }

    pub fn is_highly_available(&self) -> bool {
        self.masters().nth(1).is_some()
    }

    pub fn is_init_master(&self, machine: &Machine) -> bool {
        self.init_master()
            .is_some_and(|init| init.name == machine.name)
    }

    pub fn full_name(&self, machine: &Machine) -> String {
        format!("{}_{}", self.name, machine.name)
    }

    /// The etcd peers `machine` announces when it joins: every master up to
    /// and including itself, in canonical order. `None` when `machine` is
    /// not a master of this cluster.
    pub fn etcd_initial_cluster_endpoints(&self, machine: &Machine) -> Option<String> {
        let position = self.masters().position(|m| m.name == machine.name)?;
        Some(
            self.masters()
                .take(position + 1)
                .map(Machine::etcd_peer)
                .collect::<Vec<_>>()
                .join(","),
        )
    }

    pub fn view<'a>(&'a self, machine: &'a Machine) -> MachineView<'a> {
        MachineView {
            cluster: self,
            machine,
        }
    }
}

/// A machine seen through the cluster it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct MachineView<'a> {
    pub cluster: &'a Cluster,
    pub machine: &'a Machine,
}

impl MachineView<'_> {
    pub fn full_name(&self) -> String {
        self.cluster.full_name(self.machine)
    }

    pub fn is_init_master(&self) -> bool {
        self.cluster.is_init_master(self.machine)
    }

    pub fn etcd_initial_cluster_endpoints(&self) -> Option<String> {
        self.cluster.etcd_initial_cluster_endpoints(self.machine)
    }

    pub fn advertise_address(&self) -> IpAddr {
        self.machine.advertise_address()
    }
}

fn machine_from_profile(index: usize, m: &MachineProfile) -> Result<Machine, ConfigurationError> {
    let name = required(&m.name, &format!("machines[{index}].name"))?;
    let role = required(&m.role, &format!("machines[{index}].role"))?;
    let role = role
        .parse()
        .map_err(|_| ConfigurationError::UnknownRole {
            machine: name.clone(),
            role,
        })?;
    let ip = m.ip.ok_or_else(|| missing(&format!("machines[{index}].ip")))?;
    Ok(Machine { name, role, ip })
}

fn required(value: &Option<String>, field: &str) -> Result<String, ConfigurationError> {
    value.clone().ok_or_else(|| missing(field))
}

fn missing(field: &str) -> ConfigurationError {
    ConfigurationError::MissingField(field.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{ClusterProfile, NetworkProfile};

    fn machine(name: &str, role: &str, ip: &str) -> MachineProfile {
        MachineProfile {
            name: Some(name.to_owned()),
            role: Some(role.to_owned()),
            ip: Some(ip.parse().unwrap()),
        }
    }

    fn profile(machines: Vec<MachineProfile>) -> Profile {
        Profile {
            cluster: Some(ClusterProfile {
                name: Some("kubernetes".to_owned()),
                token: Some("abcdef.0123456789abcdef".to_owned()),
                bootstrap: Some(true),
                network: Some(NetworkProfile {
                    pod_subnet: Some("10.244.0.0/16".to_owned()),
                    service_subnet: Some("10.96.0.0/12".to_owned()),
                }),
            }),
            machines: Some(machines),
        }
    }

    fn names<'a>(machines: impl IntoIterator<Item = &'a Machine>) -> Vec<&'a str> {
        machines.into_iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn example_topology() {
        let cluster = Cluster::from_profile(&profile(vec![
            machine("lb1", "loadbalancer", "10.0.0.1"),
            machine("w1", "worker", "10.0.0.3"),
            machine("m1", "master", "10.0.0.2"),
        ]))
        .unwrap();

        assert_eq!(names(cluster.machines()), ["lb1", "m1", "w1"]);
        assert_eq!(cluster.init_master().unwrap().name, "m1");
        assert_eq!(cluster.lb().unwrap().name, "lb1");
        assert_eq!(names(cluster.cluster_machines()), ["m1", "w1"]);
        let m1 = cluster.machine("m1").unwrap();
        assert_eq!(cluster.full_name(m1), "kubernetes_m1");
        assert!(cluster.is_init_master(m1));
        assert!(!cluster.is_highly_available());
    }

    #[test]
    fn ordering_is_stable_within_roles() {
        let cluster = Cluster::from_profile(&profile(vec![
            machine("w2", "worker", "10.0.0.12"),
            machine("m2", "master", "10.0.0.3"),
            machine("w1", "worker", "10.0.0.11"),
            machine("lb", "loadbalancer", "10.0.0.1"),
            machine("m1", "master", "10.0.0.2"),
            machine("w3", "worker", "10.0.0.13"),
        ]))
        .unwrap();

        assert_eq!(
            names(cluster.machines()),
            ["lb", "m2", "m1", "w2", "w1", "w3"]
        );
        let roles: Vec<Role> = cluster.machines().iter().map(|m| m.role).collect();
        let mut sorted = roles.clone();
        sorted.sort();
        assert_eq!(roles, sorted);
        assert_eq!(cluster.init_master().unwrap().name, "m2");
    }

    #[test]
    fn etcd_endpoints_accumulate_in_master_order() {
        let cluster = Cluster::from_profile(&profile(vec![
            machine("m1", "master", "10.0.0.1"),
            machine("m2", "master", "10.0.0.2"),
            machine("m3", "master", "10.0.0.3"),
            machine("w1", "worker", "10.0.0.4"),
        ]))
        .unwrap();

        let m1 = cluster.machine("m1").unwrap();
        let m2 = cluster.machine("m2").unwrap();
        let w1 = cluster.machine("w1").unwrap();
        assert_eq!(
            cluster.etcd_initial_cluster_endpoints(m1).unwrap(),
            "m1=https://10.0.0.1:2380"
        );
        assert_eq!(
            cluster.etcd_initial_cluster_endpoints(m2).unwrap(),
            "m1=https://10.0.0.1:2380,m2=https://10.0.0.2:2380"
        );
        assert_eq!(cluster.etcd_initial_cluster_endpoints(w1), None);
        assert!(cluster.is_highly_available());
    }

    #[test]
    fn etcd_endpoints_bracket_ipv6() {
        let cluster =
            Cluster::from_profile(&profile(vec![machine("m1", "master", "fd00::10")])).unwrap();
        let view = cluster.view(&cluster.machines()[0]);
        assert_eq!(
            view.etcd_initial_cluster_endpoints().unwrap(),
            "m1=https://[fd00::10]:2380"
        );
        assert!(view.is_init_master());
        assert_eq!(view.full_name(), "kubernetes_m1");
    }

    #[test]
    fn queries_without_masters_or_lb() {
        let cluster =
            Cluster::from_profile(&profile(vec![machine("w1", "worker", "10.0.0.1")])).unwrap();
        assert!(cluster.init_master().is_none());
        assert!(cluster.lb().is_none());
        assert!(!cluster.is_highly_available());
        assert!(!cluster.is_init_master(&cluster.machines()[0]));
    }

    #[test]
    fn queries_are_repeatable() {
        let cluster = Cluster::from_profile(&profile(vec![
            machine("m1", "master", "10.0.0.1"),
            machine("lb", "loadbalancer", "10.0.0.9"),
        ]))
        .unwrap();
        assert_eq!(names(cluster.masters()), names(cluster.masters()));
        assert_eq!(cluster.lb(), cluster.lb());
        assert_eq!(cluster.init_master(), cluster.init_master());
    }

    #[test]
    fn unknown_role_is_rejected() {
        let err = Cluster::from_profile(&profile(vec![machine("db", "database", "10.0.0.1")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::UnknownRole { ref machine, ref role } if machine == "db" && role == "database"
        ));
    }

    #[test]
    fn duplicate_machine_is_rejected() {
        let err = Cluster::from_profile(&profile(vec![
            machine("m1", "master", "10.0.0.1"),
            machine("m1", "worker", "10.0.0.2"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicateMachine(ref n) if n == "m1"));
    }

    #[test]
    fn missing_fields_are_named() {
        let mut p = profile(vec![MachineProfile {
            ip: None,
            ..machine("m1", "master", "10.0.0.1")
        }]);
        let err = Cluster::from_profile(&p).unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingField(ref f) if f == "machines[0].ip"));

        p.cluster.as_mut().unwrap().network.as_mut().unwrap().pod_subnet = None;
        let err = Cluster::from_profile(&p).unwrap_err();
        assert!(
            matches!(err, ConfigurationError::MissingField(ref f) if f == "cluster.network.pod_subnet")
        );

        let err = Cluster::from_profile(&Profile::default()).unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingField(ref f) if f == "cluster"));
    }
}
