use std::{collections::BTreeMap, net::IpAddr, path::PathBuf};

use serde::Serialize;

use crate::{
    cluster::{Cluster, MachineView, Role},
    config::{Settings, VagrantAction},
    images::ContainerImages,
    paths::manifests_config_target_path,
};

/// Everything a provisioning template needs to know about one machine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MachineContext {
    pub cluster: ClusterContext,
    pub machine: MachineFacts,
    pub packages: Vec<Artifact>,
    pub images: Vec<Artifact>,
    pub manifests: Vec<Artifact>,
    pub container_images: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterContext {
    pub name: String,
    pub token: String,
    pub bootstrap: bool,
    pub pod_subnet: String,
    pub service_subnet: String,
    pub highly_available: bool,
    pub init_master: Option<String>,
    pub lb: Option<IpAddr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MachineFacts {
    pub name: String,
    pub full_name: String,
    pub role: Role,
    pub ip: IpAddr,
    pub advertise_address: IpAddr,
    pub init_master: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etcd_initial_cluster: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Artifact {
    pub name: String,
    pub path: PathBuf,
}

impl MachineContext {
    pub fn new(
        view: MachineView<'_>,
        settings: &Settings,
        action: &VagrantAction,
        images: &ContainerImages,
    ) -> Self {
        let cluster = view.cluster;
        let machine = view.machine;
        let tree = settings.kubernetes();

        MachineContext {
            cluster: ClusterContext::new(cluster),
            machine: MachineFacts {
                name: machine.name.clone(),
                full_name: view.full_name(),
                role: machine.role,
                ip: machine.ip,
                advertise_address: view.advertise_address(),
                init_master: view.is_init_master(),
                etcd_initial_cluster: view.etcd_initial_cluster_endpoints(),
            },
            packages: settings
                .packages()
                .into_iter()
                .map(|name| Artifact {
                    path: tree.package_path(&name),
                    name,
                })
                .collect(),
            images: settings
                .images()
                .into_iter()
                .map(|name| Artifact {
                    path: tree.image_path(&name),
                    name,
                })
                .collect(),
            manifests: settings
                .manifests(action)
                .into_iter()
                .map(|name| Artifact {
                    path: manifests_config_target_path(&format!("{name}.yaml")).into(),
                    name,
                })
                .collect(),
            container_images: images.refs(),
        }
    }
}

impl ClusterContext {
    pub fn new(cluster: &Cluster) -> Self {
        ClusterContext {
            name: cluster.name.clone(),
            token: cluster.token.clone(),
            bootstrap: cluster.bootstrap,
            pod_subnet: cluster.network.pod_subnet.clone(),
            service_subnet: cluster.network.service_subnet.clone(),
            highly_available: cluster.is_highly_available(),
            init_master: cluster.init_master().map(|m| m.name.clone()),
            lb: cluster.lb().map(|m| m.ip),
        }
    }
}
