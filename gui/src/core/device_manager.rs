//! Device management abstraction for fingerprint operations.

use crate::core::fprintd::{self, errors};
use log::{error, info, warn};

/// Error types for device management operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    ConnectionFailed(String),
    NoDeviceAvailable,
    DeviceBusy(String),
    ClaimFailed(String),
    NoEnrolledPrints,
    OperationFailed(String),
}

impl std::fmt::Display for DeviceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            DeviceError::NoDeviceAvailable => write!(f, "No fingerprint devices available"),
            DeviceError::DeviceBusy(msg) => write!(f, "Device is busy: {}", msg),
            DeviceError::ClaimFailed(msg) => write!(f, "Failed to claim device: {}", msg),
            DeviceError::NoEnrolledPrints => write!(f, "No fingerprints enrolled"),
            DeviceError::OperationFailed(msg) => write!(f, "Operation failed: {}", msg),
        }
    }
}

impl std::error::Error for DeviceError {}

impl DeviceError {
    /// Classify a failed Claim call.
    pub fn from_claim(err: &zbus::Error) -> Self {
        match fprintd::error_name(err) {
            Some(errors::ALREADY_IN_USE) => DeviceError::DeviceBusy(err.to_string()),
            Some(errors::NO_SUCH_DEVICE) => DeviceError::NoDeviceAvailable,
            _ => DeviceError::ClaimFailed(err.to_string()),
        }
    }

    /// Classify any other failed device call.
    pub fn from_operation(err: &zbus::Error) -> Self {
        match fprintd::error_name(err) {
            Some(errors::NO_ENROLLED_PRINTS) => DeviceError::NoEnrolledPrints,
            Some(errors::NO_SUCH_DEVICE) => DeviceError::NoDeviceAvailable,
            Some(errors::ALREADY_IN_USE) => DeviceError::DeviceBusy(err.to_string()),
            _ => DeviceError::OperationFailed(err.to_string()),
        }
    }
}

/// RAII-style device manager for fprintd operations.
pub struct DeviceManager {
    device: Option<fprintd::Device>,
}

impl DeviceManager {
    /// Acquire a fingerprint device with automatic cleanup.
    pub async fn acquire() -> Result<Self, DeviceError> {
        info!("Acquiring fingerprint device for operation");

        let client = Self::connect_to_fprintd().await?;
        let device = Self::get_first_device(&client).await?;
        Self::claim_device(&device).await?;

        info!("Successfully acquired and claimed fingerprint device");
        Ok(Self {
            device: Some(device),
        })
    }

    /// Get a reference to the managed device.
    pub fn device(&self) -> Result<&fprintd::Device, DeviceError> {
        self.device
            .as_ref()
            .ok_or_else(|| DeviceError::OperationFailed("Device not available".to_string()))
    }

    /// Enrolled fingers of the current user. An empty list is reported as `NoEnrolledPrints`.
    pub async fn enrolled_fingers(&self) -> Result<Vec<String>, DeviceError> {
        let device = self.device()?;
        info!("Retrieving list of enrolled fingerprints");
        match device.list_enrolled_fingers("").await {
            Ok(list) if list.is_empty() => {
                info!("No enrolled fingerprints found for current user");
                Err(DeviceError::NoEnrolledPrints)
            }
            Ok(list) => {
                info!("Found {} enrolled fingerprint(s)", list.len());
                Ok(list)
            }
            Err(e) => {
                let err = DeviceError::from_operation(&e);
                if err != DeviceError::NoEnrolledPrints {
                    error!("Failed to retrieve enrolled fingerprints: {}", e);
                }
                Err(err)
            }
        }
    }

    /// Release the device now instead of on drop.
    pub async fn release(mut self) {
        if let Some(device) = self.device.take() {
            info!("Releasing fingerprint device");
            if let Err(e) = device.release().await {
                warn!("Failed to release device: {}", e);
            } else {
                info!("Successfully released fingerprint device");
            }
        }
    }

    /// Connect to fprintd system bus.
    async fn connect_to_fprintd() -> Result<fprintd::Client, DeviceError> {
        info!("Connecting to fprintd system bus");
        match fprintd::Client::system().await {
            Ok(client) => {
                info!("Successfully connected to fprintd");
                Ok(client)
            }
            Err(e) => {
                error!("Failed to connect to fprintd system bus: {}", e);
                Err(DeviceError::ConnectionFailed(e.to_string()))
            }
        }
    }

    /// Get the first available fingerprint device.
    async fn get_first_device(client: &fprintd::Client) -> Result<fprintd::Device, DeviceError> {
        info!("Looking for available fingerprint devices");
        match fprintd::first_device(client).await {
            Ok(Some(device)) => {
                info!("Found fingerprint device at {}", device.object_path());
                Ok(device)
            }
            Ok(None) => {
                warn!("No fingerprint devices available");
                warn!("Please connect a fingerprint reader and try again");
                Err(DeviceError::NoDeviceAvailable)
            }
            Err(e) => {
                error!("Failed to enumerate devices: {}", e);
                error!("This usually means fprintd service is not running or not installed");
                Err(DeviceError::ConnectionFailed(format!(
                    "Failed to enumerate devices: {}",
                    e
                )))
            }
        }
    }

    /// Claim the device for exclusive access.
    async fn claim_device(device: &fprintd::Device) -> Result<(), DeviceError> {
        info!("Claiming fingerprint device for exclusive access");
        match device.claim("").await {
            Ok(_) => {
                info!("Successfully claimed device");
                Ok(())
            }
            Err(e) => {
                error!("Failed to claim device: {}", e);
                Err(DeviceError::from_claim(&e))
            }
        }
    }
}

impl Drop for DeviceManager {
    /// Automatic cleanup when DeviceManager goes out of scope.
    fn drop(&mut self) {
        if let Some(device) = self.device.take() {
            info!("Cleaning up device in destructor");
            tokio::spawn(async move {
                if let Err(e) = device.release().await {
                    warn!("Failed to release device during cleanup: {}", e);
                } else {
                    info!("Successfully released device during cleanup");
                }
            });
        }
    }
}
