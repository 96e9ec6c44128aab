//! D-Bus interface implementation using zbus.
//!
//! Provides the `org.imgtune.Daemon1` interface.

use std::sync::Arc;

use tracing::{debug, info, warn};
use zbus::{interface, Connection};

use crate::config::DbusBusType;
use crate::state::AppState;

/// D-Bus interface implementation for the imgtune daemon.
pub struct Daemon1Interface {
    state: Arc<AppState>,
    shutdown_tx: tokio::sync::mpsc::Sender<()>,
}

impl Daemon1Interface {
    /// Creates a new D-Bus interface.
    pub fn new(state: Arc<AppState>, shutdown_tx: tokio::sync::mpsc::Sender<()>) -> Self {
        Self { state, shutdown_tx }
    }
}

#[interface(name = "org.imgtune.Daemon1")]
impl Daemon1Interface {
    /// Lists all known display modes as (id, name) pairs.
    fn list_modes(&self) -> Vec<(i32, String)> {
        self.state.list_modes()
    }

    /// Gets the mode the panel is currently in.
    fn current_mode(&self) -> (i32, String) {
        self.state.current_mode()
    }

    /// Gets the configured default mode.
    fn default_mode(&self) -> (i32, String) {
        self.state.default_mode()
    }

    /// Switches the panel mode, optionally persisting it as the default.
    ///
    /// Returns false when the id is not in the mode table or a control
    /// file cannot be written.
    fn set_mode(&self, mode_id: i32, make_default: bool) -> bool {
        match self.state.set_mode(mode_id, make_default) {
            Ok(()) => {
                debug!("D-Bus: SetMode({}, {})", mode_id, make_default);
                true
            }
            Err(e) => {
                warn!("SetMode({}, {}) failed: {}", mode_id, make_default, e);
                false
            }
        }
    }

    /// Shuts down the daemon.
    async fn quit(&self) -> zbus::fdo::Result<()> {
        info!("D-Bus: Quit requested");
        self.shutdown_tx
            .send(())
            .await
            .map_err(|e| zbus::fdo::Error::Failed(e.to_string()))?;
        Ok(())
    }

    // Properties

    /// Name of the mode the panel is currently in.
    #[zbus(property)]
    fn current_mode_name(&self) -> String {
        self.state.current_mode().1
    }

    /// Name of the configured default mode.
    #[zbus(property)]
    fn default_mode_name(&self) -> String {
        self.state.default_mode().1
    }
}

/// Connects to the appropriate D-Bus bus based on configuration.
async fn connect_to_bus(bus_type: DbusBusType) -> anyhow::Result<(Connection, &'static str)> {
    match bus_type {
        DbusBusType::Session => {
            let conn = Connection::session()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to connect to session bus: {}", e))?;
            Ok((conn, "session"))
        }
        DbusBusType::System => {
            let conn = Connection::system()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to connect to system bus: {}", e))?;
            Ok((conn, "system"))
        }
        DbusBusType::Auto => {
            // Try session bus first, fall back to system bus
            match Connection::session().await {
                Ok(conn) => Ok((conn, "session")),
                Err(session_err) => {
                    warn!(
                        "Session bus unavailable ({}), trying system bus",
                        session_err
                    );
                    let conn = Connection::system().await.map_err(|system_err| {
                        anyhow::anyhow!(
                            "Failed to connect to any D-Bus: session={}, system={}",
                            session_err,
                            system_err
                        )
                    })?;
                    Ok((conn, "system"))
                }
            }
        }
    }
}

/// Runs the D-Bus server.
pub async fn run_dbus_server(
    state: Arc<AppState>,
    shutdown_tx: tokio::sync::mpsc::Sender<()>,
    bus_type: DbusBusType,
) -> anyhow::Result<Connection> {
    let interface = Daemon1Interface::new(state, shutdown_tx);

    let (connection, bus_name) = connect_to_bus(bus_type).await?;

    connection
        .object_server()
        .at("/org/imgtune/Daemon", interface)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to register object: {}", e))?;

    connection
        .request_name("org.imgtune.Daemon")
        .await
        .map_err(|e| anyhow::anyhow!("Failed to request bus name: {}", e))?;

    info!(
        "D-Bus service registered at org.imgtune.Daemon on {} bus",
        bus_name
    );
    Ok(connection)
}
