//! Peripheral declarations and declaration sets.
//!
//! A declaration file lists peripherals in order:
//!
//! ```toml
//! [[peripheral]]
//! instance = "UART1"
//! kind = "uart"
//! transfer-mode = "polling"
//! baud-rate = 9600
//! pins = [{ pin = "PA9", role = "tx" }, { pin = "PA10", role = "rx" }]
//! ```

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::params::gpio::{GpioLineParams, Pull, Speed};
use crate::params::i2c::I2cParams;
use crate::params::uart::UartParams;
use crate::params::PeripheralParams;
use crate::pin::PinRef;
use crate::signal::{PeripheralKind, SignalRole};

/// A peripheral instance identifier such as `UART1`, `I2C2` or `LED_GREEN`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(String);

impl InstanceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The trailing instance number (`UART1` -> `1`).
    pub fn number(&self) -> Option<&str> {
        let digits_start = self
            .0
            .char_indices()
            .rev()
            .take_while(|(_, c)| c.is_ascii_digit())
            .last()
            .map(|(i, _)| i)?;
        Some(&self.0[digits_start..])
    }

    /// C handle variable for this instance: `h` plus the whole id in lower
    /// case (`UART1` -> `huart1`, `LPUART1` -> `hlpuart1`). Characters that
    /// cannot appear in an identifier become `_`.
    pub fn handle_name(&self) -> String {
        let mut name = String::with_capacity(self.0.len() + 1);
        name.push('h');
        for c in self.0.chars() {
            name.push(if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            });
        }
        name
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InstanceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A pin claimed by a declaration, with the role it plays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PinAssignment {
    pub pin: PinRef,
    pub role: SignalRole,
    /// Overrides the kind's default pull for this pin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull: Option<Pull>,
    /// Overrides the kind's default speed for this pin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<Speed>,
    /// Name used for `<label>_Pin` / `<label>_GPIO_Port` defines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl PinAssignment {
    pub fn new(pin: PinRef, role: SignalRole) -> Self {
        Self {
            pin,
            role,
            pull: None,
            speed: None,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_pull(mut self, pull: Pull) -> Self {
        self.pull = Some(pull);
        self
    }

    pub fn with_speed(mut self, speed: Speed) -> Self {
        self.speed = Some(speed);
        self
    }
}

/// One requested peripheral instance.
///
/// `transfer_mode` keeps the tag exactly as supplied; it is checked during
/// resolution, never here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "DeclarationFields")]
pub struct PeripheralDeclaration {
    pub instance: InstanceId,
    pub transfer_mode: String,
    #[serde(default)]
    pub pins: Vec<PinAssignment>,
    #[serde(flatten)]
    pub params: PeripheralParams,
}

impl PeripheralDeclaration {
    pub fn new(
        instance: impl Into<String>,
        transfer_mode: impl Into<String>,
        params: PeripheralParams,
    ) -> Self {
        Self {
            instance: InstanceId::new(instance),
            transfer_mode: transfer_mode.into(),
            pins: Vec::new(),
            params,
        }
    }

    pub fn uart(instance: impl Into<String>, transfer_mode: impl Into<String>, params: UartParams) -> Self {
        Self::new(instance, transfer_mode, PeripheralParams::Uart(params))
    }

    pub fn i2c(instance: impl Into<String>, transfer_mode: impl Into<String>, params: I2cParams) -> Self {
        Self::new(instance, transfer_mode, PeripheralParams::I2c(params))
    }

    pub fn gpio_line(instance: impl Into<String>, params: GpioLineParams) -> Self {
        Self::new(instance, "POLLING", PeripheralParams::GpioLine(params))
    }

    /// Append a pin claim.
    pub fn with_pin(mut self, pin: PinRef, role: SignalRole) -> Self {
        self.pins.push(PinAssignment::new(pin, role));
        self
    }

    pub fn with_assignment(mut self, assignment: PinAssignment) -> Self {
        self.pins.push(assignment);
        self
    }

    pub fn kind(&self) -> PeripheralKind {
        self.params.kind()
    }
}

/// Wire form of a declaration. Keys other than the common ones are handed to
/// the kind's parameter struct, which rejects any it does not know.
#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct DeclarationFields {
    instance: InstanceId,
    transfer_mode: String,
    #[serde(default)]
    pins: Vec<PinAssignment>,
    kind: PeripheralKind,
    #[serde(flatten)]
    params: serde_json::Map<String, serde_json::Value>,
}

impl TryFrom<DeclarationFields> for PeripheralDeclaration {
    type Error = String;

    fn try_from(fields: DeclarationFields) -> std::result::Result<Self, String> {
        let raw = serde_json::Value::Object(fields.params);
        let params = match fields.kind {
            PeripheralKind::Uart => serde_json::from_value(raw).map(PeripheralParams::Uart),
            PeripheralKind::I2c => serde_json::from_value(raw).map(PeripheralParams::I2c),
            PeripheralKind::GpioLine => serde_json::from_value(raw).map(PeripheralParams::GpioLine),
        }
        .map_err(|e| format!("{} ({}): {e}", fields.instance, fields.kind.name()))?;

        Ok(Self {
            instance: fields.instance,
            transfer_mode: fields.transfer_mode,
            pins: fields.pins,
            params,
        })
    }
}

/// The full, ordered set of declarations for one generation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeclarationSet {
    #[serde(default, rename = "peripheral")]
    pub peripherals: Vec<PeripheralDeclaration>,
}

impl DeclarationSet {
    pub fn new(peripherals: Vec<PeripheralDeclaration>) -> Self {
        Self { peripherals }
    }

    pub fn is_empty(&self) -> bool {
        self.peripherals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.peripherals.len()
    }

    /// Parse a declaration set from TOML.
    pub fn from_toml(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Parse a declaration set from JSON.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load a declaration file, choosing the format from its extension.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml(&content),
            Some("json") => Self::from_json(&content),
            _ => Err(CoreError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::gpio::GpioMode;
    use crate::params::uart::Parity;
    use crate::pin::Port;

    const SAMPLE: &str = r#"
[[peripheral]]
instance = "UART1"
kind = "uart"
transfer-mode = "polling"
baud-rate = 9600
parity = "even"
pins = [{ pin = "PA9", role = "tx" }, { pin = "PA10", role = "rx" }]

[[peripheral]]
instance = "I2C1"
kind = "i2c"
transfer-mode = "INTERRUPT"
clock-speed-hz = 400000
pins = [
    { pin = "PB8", role = "scl" },
    { pin = "PB9", role = "sda", pull = "none" },
]

[[peripheral]]
instance = "LED_GREEN"
kind = "gpio-line"
transfer-mode = "polling"
mode = "output-pp"
pins = [{ pin = "PA5", role = "line", label = "LD2" }]
"#;

    #[test]
    fn parse_toml_declarations() {
        let set = DeclarationSet::from_toml(SAMPLE).unwrap();
        assert_eq!(set.len(), 3);

        let uart = &set.peripherals[0];
        assert_eq!(uart.instance.as_str(), "UART1");
        assert_eq!(uart.kind(), PeripheralKind::Uart);
        assert_eq!(uart.transfer_mode, "polling");
        assert_eq!(uart.pins[1].pin, PinRef::of(Port::A, 10));
        match &uart.params {
            PeripheralParams::Uart(p) => {
                assert_eq!(p.baud_rate, 9600);
                assert_eq!(p.parity, Parity::Even);
            }
            other => panic!("expected UART params, got {other:?}"),
        }

        let i2c = &set.peripherals[1];
        assert_eq!(i2c.kind(), PeripheralKind::I2c);
        assert_eq!(i2c.pins[1].pull, Some(Pull::None));

        let led = &set.peripherals[2];
        assert_eq!(led.pins[0].label.as_deref(), Some("LD2"));
        match &led.params {
            PeripheralParams::GpioLine(p) => assert_eq!(p.mode, GpioMode::OutputPp),
            other => panic!("expected GPIO params, got {other:?}"),
        }
    }

    #[test]
    fn unknown_transfer_mode_is_kept_verbatim() {
        let set = DeclarationSet::from_toml(
            r#"
[[peripheral]]
instance = "UART2"
kind = "uart"
transfer-mode = "BURST"
"#,
        )
        .unwrap();
        assert_eq!(set.peripherals[0].transfer_mode, "BURST");
        assert!(set.peripherals[0].pins.is_empty());
    }

    #[test]
    fn misspelled_parameter_is_rejected() {
        let err = DeclarationSet::from_toml(
            r#"
[[peripheral]]
instance = "UART1"
kind = "uart"
transfer-mode = "polling"
baudrate = 9600
"#,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Toml(_)));
        let msg = err.to_string();
        assert!(msg.contains("unknown field `baudrate`"), "{msg}");
        assert!(msg.contains("UART1 (uart)"), "{msg}");
    }

    #[test]
    fn parameter_of_another_kind_is_rejected() {
        let json = r#"{ "peripheral": [
            { "instance": "LED", "kind": "gpio-line", "transfer-mode": "polling", "baud-rate": 9600 }
        ] }"#;
        let err = DeclarationSet::from_json(json).unwrap_err();
        assert!(err.to_string().contains("unknown field `baud-rate`"));
    }

    #[test]
    fn unknown_keys_in_pins_devices_and_root_are_rejected() {
        let pin_typo = r#"
[[peripheral]]
instance = "UART1"
kind = "uart"
transfer-mode = "polling"
pins = [{ pin = "PA9", role = "tx", lable = "DBG_TX" }]
"#;
        assert!(DeclarationSet::from_toml(pin_typo).is_err());

        let device_typo = r#"
[[peripheral]]
instance = "I2C1"
kind = "i2c"
transfer-mode = "polling"
devices = [{ name = "BME280", addr = 0x76 }]
"#;
        assert!(DeclarationSet::from_toml(device_typo).is_err());

        let root_typo = "[[peripherals]]\ninstance = \"UART1\"\nkind = \"uart\"\ntransfer-mode = \"polling\"\n";
        assert!(DeclarationSet::from_toml(root_typo).is_err());
    }

    #[test]
    fn parse_json_declarations() {
        let json = r#"{
            "peripheral": [
                {
                    "instance": "UART2",
                    "kind": "uart",
                    "transfer-mode": "DMA",
                    "baud-rate": 57600,
                    "pins": [{ "pin": "PA2", "role": "tx" }]
                }
            ]
        }"#;
        let set = DeclarationSet::from_json(json).unwrap();
        assert_eq!(set.peripherals[0].transfer_mode, "DMA");
        assert_eq!(set.peripherals[0].pins[0].role, SignalRole::Tx);
    }

    #[test]
    fn reject_unknown_kind() {
        let result = DeclarationSet::from_toml(
            r#"
[[peripheral]]
instance = "SPI1"
kind = "spi"
transfer-mode = "polling"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn reject_bad_pin_label() {
        let result = DeclarationSet::from_toml(
            r#"
[[peripheral]]
instance = "UART1"
kind = "uart"
transfer-mode = "polling"
pins = [{ pin = "X9", role = "tx" }]
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn toml_round_trip_through_file() {
        let set = DeclarationSet::from_toml(SAMPLE).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("peripherals.toml");
        std::fs::write(&path, set.to_toml().unwrap()).unwrap();
        let loaded = DeclarationSet::load(&path).unwrap();
        assert_eq!(loaded, set);
    }

    #[test]
    fn load_rejects_missing_and_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let missing = DeclarationSet::load(&dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(CoreError::NotFound { .. })));

        let yaml = dir.path().join("peripherals.yaml");
        std::fs::write(&yaml, "peripheral: []").unwrap();
        assert!(matches!(
            DeclarationSet::load(&yaml),
            Err(CoreError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn instance_number() {
        assert_eq!(InstanceId::from("UART1").number(), Some("1"));
        assert_eq!(InstanceId::from("I2C12").number(), Some("12"));
        assert_eq!(InstanceId::from("LED_GREEN").number(), None);
    }

    #[test]
    fn handle_names_keep_the_whole_id() {
        assert_eq!(InstanceId::from("UART1").handle_name(), "huart1");
        assert_eq!(InstanceId::from("LPUART1").handle_name(), "hlpuart1");
        assert_eq!(InstanceId::from("I2C2").handle_name(), "hi2c2");
        assert_eq!(InstanceId::from("uart-dbg").handle_name(), "huart_dbg");
    }

    #[test]
    fn builder_appends_pins_in_order() {
        let decl = PeripheralDeclaration::uart("UART1", "POLLING", UartParams::default())
            .with_pin(PinRef::of(Port::A, 9), SignalRole::Tx)
            .with_pin(PinRef::of(Port::A, 10), SignalRole::Rx);
        assert_eq!(decl.pins.len(), 2);
        assert_eq!(decl.pins[0].role, SignalRole::Tx);
    }
}
