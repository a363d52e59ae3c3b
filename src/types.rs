//! Type definitions and enums.

use std::fmt;

use crate::error::Error;

/// How user input (DTMF) is sent on a connection.
///
/// Mirrors the native `OpalUserInputModes` enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UserInputMode {
    /// Let the protocol pick its usual mode.
    #[default]
    Default,
    /// H.323 Q.931 keypad information elements.
    AsQ931,
    /// Signalling-channel string messages (H.245 or SIP INFO).
    AsString,
    /// Signalling-channel tone messages.
    AsTone,
    /// RFC 2833 named telephone events in the RTP stream.
    AsRfc2833,
    /// Audio tones mixed into the media.
    InBand,
}

impl UserInputMode {
    /// Name of the native enumeration.
    pub const NATIVE_NAME: &'static str = "OpalUserInputModes";

    /// Every mode, in native value order.
    pub const ALL: [UserInputMode; 6] = [
        UserInputMode::Default,
        UserInputMode::AsQ931,
        UserInputMode::AsString,
        UserInputMode::AsTone,
        UserInputMode::AsRfc2833,
        UserInputMode::InBand,
    ];
}

impl From<UserInputMode> for i32 {
    fn from(mode: UserInputMode) -> i32 {
        match mode {
            UserInputMode::Default => 0,
            UserInputMode::AsQ931 => 1,
            UserInputMode::AsString => 2,
            UserInputMode::AsTone => 3,
            UserInputMode::AsRfc2833 => 4,
            UserInputMode::InBand => 5,
        }
    }
}

impl TryFrom<i32> for UserInputMode {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(UserInputMode::Default),
            1 => Ok(UserInputMode::AsQ931),
            2 => Ok(UserInputMode::AsString),
            3 => Ok(UserInputMode::AsTone),
            4 => Ok(UserInputMode::AsRfc2833),
            5 => Ok(UserInputMode::InBand),
            _ => Err(Error::InvalidEnumValue {
                name: Self::NATIVE_NAME,
                value,
            }),
        }
    }
}

/// Version of the library behind a boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LibraryVersion {
    /// Major version.
    pub major: u32,
    /// Minor version.
    pub minor: u32,
    /// Build number.
    pub build: u32,
}

impl LibraryVersion {
    /// Version of these bindings.
    pub const BINDING: LibraryVersion = LibraryVersion {
        major: crate::version::MAJOR,
        minor: crate::version::MINOR,
        build: crate::version::BUILD,
    };
}

impl fmt::Display for LibraryVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.build)
    }
}

/// Product identification sent in protocol messages.
///
/// The plain value form of a native `OpalProductDescription`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInfo {
    /// Vendor name.
    pub vendor: String,
    /// Product name.
    pub name: String,
    /// Product version.
    pub version: String,
    /// ITU-T T.35 country code.
    pub t35_country_code: u32,
    /// ITU-T T.35 extension code.
    pub t35_extension: u32,
    /// Manufacturer code.
    pub manufacturer_code: u32,
}

impl Default for ProductInfo {
    fn default() -> Self {
        Self {
            vendor: String::new(),
            name: String::new(),
            version: String::new(),
            // Australia, no extension, code allocated by the ACA in Oct 2000
            t35_country_code: 9,
            t35_extension: 0,
            manufacturer_code: 61,
        }
    }
}

impl fmt::Display for ProductInfo {
    /// Tab separated `name`, `version`, T.35 code block and `vendor`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t", self.name, self.version)?;
        if self.t35_country_code != 0 && self.manufacturer_code != 0 {
            write!(f, "{}", self.t35_country_code)?;
            if self.t35_extension != 0 {
                write!(f, ".{}", self.t35_extension)?;
            }
            write!(f, "/{}", self.manufacturer_code)?;
        }
        write!(f, "\t{}", self.vendor)
    }
}

/// Options for a protocol parameter block.
///
/// Fields left as `None` keep whatever the native block holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtocolOptions {
    /// Protocol prefix, e.g. "sip", "h323" or "iax2".
    pub prefix: Option<String>,
    /// Default user name for calls.
    pub user_name: Option<String>,
    /// Default display name for calls.
    pub display_name: Option<String>,
    /// Product identification.
    pub product: Option<ProductInfo>,
    /// Interfaces to listen on. `"*"` means all.
    pub interface_addresses: Option<Vec<String>>,
    /// User input mode.
    pub user_input_mode: Option<UserInputMode>,
    /// Default connection options as `key=value` pairs.
    pub default_options: Option<Vec<(String, String)>>,
}

/// Interface address meaning every local interface.
pub const ALL_INTERFACES: &str = "*";

/// Split the native interface address text into its entries.
pub fn parse_interface_addresses(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|s| s.trim_end_matches('\r').trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join interface addresses into the native text form.
pub fn format_interface_addresses<S: AsRef<str>>(addresses: &[S]) -> String {
    addresses
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split the native default options text into `key=value` pairs.
///
/// Lines without `=` become a key with an empty value. Keys and values are
/// kept verbatim, whitespace included.
pub fn parse_default_options(text: &str) -> Vec<(String, String)> {
    text.split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(|line| match line.split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (line.to_string(), String::new()),
        })
        .collect()
}

/// Join `key=value` pairs into the native text form.
pub fn format_default_options<K: AsRef<str>, V: AsRef<str>>(options: &[(K, V)]) -> String {
    options
        .iter()
        .map(|(k, v)| format!("{}={}", k.as_ref(), v.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}
