//! D-Bus client library for communicating with the imgtune daemon.
//!
//! This crate provides a unified client for CLI and other frontends.

use anyhow::{Context, Result};
use tracing::debug;
use zbus::{proxy, Connection};

/// D-Bus bus type selection.
#[derive(Debug, Clone, Copy, Default)]
pub enum BusType {
    /// Session bus (user session).
    Session,
    /// System bus (system-wide).
    System,
    /// Try session first, fall back to system.
    #[default]
    Auto,
}

/// D-Bus proxy for the imgtune daemon.
#[proxy(
    interface = "org.imgtune.Daemon1",
    default_service = "org.imgtune.Daemon",
    default_path = "/org/imgtune/Daemon"
)]
trait Daemon1 {
    /// Lists all known display modes as (id, name) pairs.
    fn list_modes(&self) -> zbus::Result<Vec<(i32, String)>>;

    /// Gets the mode the panel is currently in.
    fn current_mode(&self) -> zbus::Result<(i32, String)>;

    /// Gets the configured default mode.
    fn default_mode(&self) -> zbus::Result<(i32, String)>;

    /// Switches the panel mode, optionally persisting it as the default.
    fn set_mode(&self, mode_id: i32, make_default: bool) -> zbus::Result<bool>;

    /// Shuts down the daemon.
    fn quit(&self) -> zbus::Result<()>;

    /// Name of the mode the panel is currently in.
    #[zbus(property)]
    fn current_mode_name(&self) -> zbus::Result<String>;

    /// Name of the configured default mode.
    #[zbus(property)]
    fn default_mode_name(&self) -> zbus::Result<String>;
}

/// D-Bus client wrapper for the daemon.
pub struct DaemonClient {
    proxy: Daemon1Proxy<'static>,
}

impl DaemonClient {
    /// Attempts to connect to the daemon via D-Bus with auto bus detection.
    ///
    /// Tries session bus first, falls back to system bus.
    pub async fn connect() -> Result<Self> {
        Self::connect_with_bus(BusType::Auto).await
    }

    /// Attempts to connect to the daemon via D-Bus with specified bus type.
    pub async fn connect_with_bus(bus_type: BusType) -> Result<Self> {
        let connection = match bus_type {
            BusType::Session => {
                debug!("Connecting to session bus");
                Connection::session()
                    .await
                    .context("Failed to connect to session bus")?
            }
            BusType::System => {
                debug!("Connecting to system bus");
                Connection::system()
                    .await
                    .context("Failed to connect to system bus")?
            }
            BusType::Auto => {
                // Try session bus first, but verify the service exists
                if let Ok(conn) = Connection::session().await {
                    debug!("Connected to session bus, checking for daemon service");
                    if Self::service_exists(&conn).await {
                        debug!("Found daemon on session bus");
                        conn
                    } else {
                        debug!("Daemon not on session bus, trying system bus");
                        let sys_conn = Connection::system()
                            .await
                            .context("Failed to connect to system bus")?;
                        if Self::service_exists(&sys_conn).await {
                            debug!("Found daemon on system bus");
                            sys_conn
                        } else {
                            // Neither bus has the service, return session for better error
                            anyhow::bail!(
                                "Daemon service not found on session or system bus. Is imgtuned running?"
                            )
                        }
                    }
                } else {
                    debug!("Session bus unavailable, trying system bus");
                    Connection::system()
                        .await
                        .context("Failed to connect to any D-Bus")?
                }
            }
        };

        let proxy = Daemon1Proxy::new(&connection)
            .await
            .context("Failed to create D-Bus proxy")?;

        Ok(Self { proxy })
    }

    /// Checks if the daemon service exists on the given connection.
    async fn service_exists(conn: &Connection) -> bool {
        use zbus::fdo::DBusProxy;
        if let Ok(dbus_proxy) = DBusProxy::new(conn).await {
            dbus_proxy
                .name_has_owner("org.imgtune.Daemon".try_into().unwrap())
                .await
                .unwrap_or(false)
        } else {
            false
        }
    }

    /// Lists all known display modes as (id, name) pairs.
    pub async fn list_modes(&self) -> Result<Vec<(i32, String)>> {
        self.proxy
            .list_modes()
            .await
            .context("Failed to list modes via D-Bus")
    }

    /// Gets the mode the panel is currently in.
    pub async fn current_mode(&self) -> Result<(i32, String)> {
        self.proxy
            .current_mode()
            .await
            .context("Failed to get current mode via D-Bus")
    }

    /// Gets the configured default mode.
    pub async fn default_mode(&self) -> Result<(i32, String)> {
        self.proxy
            .default_mode()
            .await
            .context("Failed to get default mode via D-Bus")
    }

    /// Switches the panel mode, optionally persisting it as the default.
    ///
    /// Returns the daemon's success flag.
    pub async fn set_mode(&self, mode_id: i32, make_default: bool) -> Result<bool> {
        self.proxy
            .set_mode(mode_id, make_default)
            .await
            .context("Failed to set mode via D-Bus")
    }

    /// Shuts down the daemon.
    pub async fn quit(&self) -> Result<()> {
        self.proxy
            .quit()
            .await
            .context("Failed to quit daemon via D-Bus")
    }

    /// Gets the name of the mode the panel is currently in.
    pub async fn current_mode_name(&self) -> Result<String> {
        self.proxy
            .current_mode_name()
            .await
            .context("Failed to get current mode name via D-Bus")
    }

    /// Gets the name of the configured default mode.
    pub async fn default_mode_name(&self) -> Result<String> {
        self.proxy
            .default_mode_name()
            .await
            .context("Failed to get default mode name via D-Bus")
    }
}
