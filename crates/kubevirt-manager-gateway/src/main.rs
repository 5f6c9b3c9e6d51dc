//! kubevirt-manager gateway
//!
//! Entry point for the HTTP service. Connects to the Kubernetes API, builds
//! the lifecycle manager and serves the VM endpoints.
//!
//! # Configuration
//!
//! - `LISTEN_ADDR`, `DEFAULT_NAMESPACE`, `REQUEST_TIMEOUT_SECONDS`: HTTP side
//! - `KUBECONFIG_PATH`, `KUBE_CONTEXT`: cluster connection; in-cluster or
//!   `$KUBECONFIG` inference when unset
//! - `VM_TEMPLATE_*`: the VM created by `POST /vms`
//! - `RUST_LOG`: log filter

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kubevirt_manager_control::{ControlConfig, VmManagerService};
use kubevirt_manager_gateway::{create_router, GatewayConfig, GatewayState};
use kubevirt_manager_orchestrator::{ClientConfig, KubeVirtClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,kubevirt_manager=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting kubevirt-manager gateway");

    let gateway_config = GatewayConfig::from_env();
    let client_config = ClientConfig::from_env();
    let control_config = ControlConfig::from_env();

    tracing::info!(
        listen_addr = %gateway_config.listen_addr,
        default_namespace = %gateway_config.default_namespace,
        kubeconfig = ?client_config.kubeconfig_path,
        context = ?client_config.context,
        template = %control_config.template.name,
        "Gateway configuration loaded"
    );

    let client = Arc::new(KubeVirtClient::new(&client_config).await?);
    tracing::info!("Kubernetes client initialized");

    let manager = Arc::new(VmManagerService::new(client, control_config));

    let listen_addr = gateway_config.listen_addr.clone();
    let app = create_router(GatewayState::new(manager, gateway_config));

    tracing::info!(listen_addr = %listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
