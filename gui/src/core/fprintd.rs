//! Async helpers for fprintd D-Bus interface.

use std::fmt;
use std::pin::Pin;

use futures_util::{Stream, StreamExt};
use log::warn;
use serde::{de::DeserializeOwned, Serialize};
use zbus::zvariant::{OwnedObjectPath, Type};
use zbus::{Connection, Proxy};

/// D-Bus service name for fprintd.
pub const SERVICE: &str = "net.reactivated.Fprint";

/// Manager object path.
pub const MANAGER_PATH: &str = "/net/reactivated/Fprint/Manager";

/// Manager interface name.
pub const IFACE_MANAGER: &str = "net.reactivated.Fprint.Manager";

/// Device interface name.
pub const IFACE_DEVICE: &str = "net.reactivated.Fprint.Device";

/// fprintd D-Bus error names.
pub mod errors {
    pub const NO_SUCH_DEVICE: &str = "net.reactivated.Fprint.Error.NoSuchDevice";
    pub const ALREADY_IN_USE: &str = "net.reactivated.Fprint.Error.AlreadyInUse";
    pub const NO_ENROLLED_PRINTS: &str = "net.reactivated.Fprint.Error.NoEnrolledPrints";
}

/// Supported finger names.
pub const FINGERS: &[&str] = &[
    "left-thumb",
    "left-index-finger",
    "left-middle-finger",
    "left-ring-finger",
    "left-little-finger",
    "right-thumb",
    "right-index-finger",
    "right-middle-finger",
    "right-ring-finger",
    "right-little-finger",
];

/// Boxed stream of VerifyStatus / EnrollStatus signal payloads.
pub type StatusStream = Pin<Box<dyn Stream<Item = StatusEvent> + Send>>;

/// Payload of the VerifyStatus and EnrollStatus signals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEvent {
    pub result: String,
    pub done: bool,
}

/// D-Bus error name carried by a failed method call, if any.
pub fn error_name(err: &zbus::Error) -> Option<&str> {
    match err {
        zbus::Error::MethodError(name, _, _) => Some(name.as_str()),
        _ => None,
    }
}

/// Async client with system bus connection.
#[derive(Clone)]
pub struct Client {
    conn: Connection,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}

impl Client {
    /// Connect to system bus.
    pub async fn system() -> zbus::Result<Self> {
        let conn = Connection::system().await?;
        Ok(Self { conn })
    }

    /// Create Manager helper.
    pub fn manager(&self) -> Manager {
        Manager {
            conn: self.conn.clone(),
        }
    }

    /// Create Device helper for specific path.
    pub fn device(&self, object_path: OwnedObjectPath) -> Device {
        Device {
            conn: self.conn.clone(),
            object_path,
        }
    }
}

/// Manager interface helper.
#[derive(Clone)]
pub struct Manager {
    conn: Connection,
}

impl fmt::Debug for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manager").finish_non_exhaustive()
    }
}

impl Manager {
    async fn proxy(&self) -> zbus::Result<Proxy<'_>> {
        Proxy::new(&self.conn, SERVICE, MANAGER_PATH, IFACE_MANAGER).await
    }

    /// Generic method call.
    async fn call<R>(
        &self,
        method: &str,
        args: &(impl Serialize + Type + fmt::Debug),
    ) -> zbus::Result<R>
    where
        R: DeserializeOwned + Type,
    {
        let proxy = self.proxy().await?;

        proxy.call(method, args).await
    }

    /// Get device object paths.
    pub async fn get_devices(&self) -> zbus::Result<Vec<OwnedObjectPath>> {
        let (paths,): (Vec<OwnedObjectPath>,) = self.call("GetDevices", &()).await?;
        Ok(paths)
    }

    /// Get default device path.
    pub async fn get_default_device(&self) -> zbus::Result<OwnedObjectPath> {
        let (path,): (OwnedObjectPath,) = self.call("GetDefaultDevice", &()).await?;
        Ok(path)
    }
}

/// Device interface helper.
#[derive(Clone)]
pub struct Device {
    conn: Connection,
    object_path: OwnedObjectPath,
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("object_path", &self.object_path)
            .finish()
    }
}

impl Device {
    async fn proxy(&self) -> zbus::Result<Proxy<'_>> {
        Proxy::new(&self.conn, SERVICE, self.object_path.as_str(), IFACE_DEVICE).await
    }

    async fn owned_proxy(&self) -> zbus::Result<Proxy<'static>> {
        Proxy::new(
            &self.conn,
            SERVICE,
            self.object_path.clone().into_inner(),
            IFACE_DEVICE,
        )
        .await
    }

    /// Get device object path.
    pub fn object_path(&self) -> &str {
        self.object_path.as_str()
    }

    /// Generic method call.
    async fn call<R>(
        &self,
        method: &str,
        args: &(impl Serialize + Type + fmt::Debug),
    ) -> zbus::Result<R>
    where
        R: DeserializeOwned + Type,
    {
        let proxy = self.proxy().await?;

        proxy.call(method, args).await
    }

    /// List enrolled fingers for user ("" for current user).
    pub async fn list_enrolled_fingers(&self, username: &str) -> zbus::Result<Vec<String>> {
        let (fingers,): (Vec<String>,) = self.call("ListEnrolledFingers", &(username,)).await?;
        Ok(fingers)
    }

    /// Start enrollment for finger.
    pub async fn enroll_start(&self, finger: &str) -> zbus::Result<()> {
        let _: () = self.call("EnrollStart", &(finger,)).await?;
        Ok(())
    }

    /// Stop enrollment.
    pub async fn enroll_stop(&self) -> zbus::Result<()> {
        let _: () = self.call("EnrollStop", &()).await?;
        Ok(())
    }

    /// Start verification for finger ("any" for all enrolled fingers).
    pub async fn verify_start(&self, finger: &str) -> zbus::Result<()> {
        let _: () = self.call("VerifyStart", &(finger,)).await?;
        Ok(())
    }

    /// Stop verification.
    pub async fn verify_stop(&self) -> zbus::Result<()> {
        let _: () = self.call("VerifyStop", &()).await?;
        Ok(())
    }

    /// Claim device for user ("" for current user).
    pub async fn claim(&self, username: &str) -> zbus::Result<()> {
        let _: () = self.call("Claim", &(username,)).await?;
        Ok(())
    }

    /// Release device.
    pub async fn release(&self) -> zbus::Result<()> {
        let _: () = self.call("Release", &()).await?;
        Ok(())
    }

    /// Get device name.
    pub async fn name(&self) -> zbus::Result<String> {
        let proxy = self.proxy().await?;
        proxy.get_property::<String>("name").await
    }

    /// Get scan type ("press" or "swipe").
    pub async fn scan_type(&self) -> zbus::Result<String> {
        let proxy = self.proxy().await?;
        proxy.get_property::<String>("scan-type").await
    }

    /// Subscribe to VerifyStatus. Subscribe before calling `verify_start`.
    pub async fn receive_verify_status(&self) -> zbus::Result<StatusStream> {
        self.receive_status("VerifyStatus").await
    }

    /// Subscribe to EnrollStatus. Subscribe before calling `enroll_start`.
    pub async fn receive_enroll_status(&self) -> zbus::Result<StatusStream> {
        self.receive_status("EnrollStatus").await
    }

    async fn receive_status(&self, signal: &'static str) -> zbus::Result<StatusStream> {
        let proxy = self.owned_proxy().await?;
        let stream = proxy.receive_signal(signal).await?;

        Ok(Box::pin(stream.filter_map(move |msg| async move {
            match msg.body().deserialize::<(String, bool)>() {
                Ok((result, done)) => Some(StatusEvent { result, done }),
                Err(e) => {
                    warn!("Ignoring malformed {} signal: {}", signal, e);
                    None
                }
            }
        })))
    }
}

/// Find first available device.
pub async fn first_device(client: &Client) -> zbus::Result<Option<Device>> {
    let mgr = client.manager();

    // Try default device first
    if let Ok(path) = mgr.get_default_device().await {
        return Ok(Some(client.device(path)));
    }

    // Fall back to first enumerated device
    let paths = mgr.get_devices().await?;
    Ok(paths.first().map(|path| client.device(path.clone())))
}
