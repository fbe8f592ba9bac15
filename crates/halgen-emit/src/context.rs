//! JSON render context for external template engines.
//!
//! The context mirrors what a Jinja-style template iterates over:
//! `port_clocks`, `instance_clocks`, `gpio_lines`, `uart_interfaces` and
//! `i2c_interfaces`, each already ordered and with HAL constants spelled out.

use serde_json::{json, Map, Value};

use halgen_core::PeripheralKind;
use halgen_resolve::{
    AlternateFunctionBinding, ClockDomain, ResolvedDeclaration, ResolvedModel, ResolvedParams,
    ResolvedPin,
};

use crate::error::Result;
use crate::sink::{walk, EmitSink, ModelHeader};

/// Builds a [`Value`] render context from a walked model.
#[derive(Debug, Default)]
pub struct ContextSink {
    root: Map<String, Value>,
    port_clocks: Vec<Value>,
    instance_clocks: Vec<Value>,
    gpio_lines: Vec<Value>,
    uart_interfaces: Vec<Value>,
    i2c_interfaces: Vec<Value>,
}

impl ContextSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EmitSink for ContextSink {
    type Output = Value;

    fn begin(&mut self, header: &ModelHeader<'_>) {
        self.root.insert("family".into(), json!(header.family));
        self.root.insert("hal_header".into(), json!(header.hal_header));
    }

    fn clock(&mut self, clock: &ClockDomain) {
        match clock {
            ClockDomain::Port { port, symbol } => self.port_clocks.push(json!({
                "port": port.to_string(),
                "symbol": symbol,
                "enable": clock_enable(symbol),
            })),
            ClockDomain::Instance { instance, symbol } => self.instance_clocks.push(json!({
                "instance": instance.as_str(),
                "symbol": symbol,
                "enable": clock_enable(symbol),
            })),
        }
    }

    fn declaration(&mut self, decl: &ResolvedDeclaration) {
        let mut fields = Map::new();
        fields.insert("instance".into(), json!(decl.instance.as_str()));
        fields.insert("transfer_mode".into(), json!(decl.transfer_mode.tag()));
        if let Some(hal) = &decl.hal_instance {
            fields.insert("interface".into(), json!(hal));
            fields.insert("num".into(), json!(decl.instance.number()));
            fields.insert("handle".into(), json!(decl.handle_name()));
            fields.insert("irqs".into(), json!(decl.irqs));
        }
        let pins: Vec<Value> = decl.pins.iter().map(pin_context).collect();
        fields.insert("pins".into(), Value::Array(pins));
        let bindings: Vec<Value> = decl.bindings.iter().map(binding_context).collect();
        fields.insert("bindings".into(), Value::Array(bindings));
        params_context(&decl.params, &mut fields);

        let entry = Value::Object(fields);
        match decl.kind {
            PeripheralKind::Uart => self.uart_interfaces.push(entry),
            PeripheralKind::I2c => self.i2c_interfaces.push(entry),
            PeripheralKind::GpioLine => self.gpio_lines.push(entry),
        }
    }

    fn finish(&mut self) -> Result<Value> {
        let mut root = std::mem::take(&mut self.root);
        root.insert("port_clocks".into(), Value::Array(std::mem::take(&mut self.port_clocks)));
        root.insert(
            "instance_clocks".into(),
            Value::Array(std::mem::take(&mut self.instance_clocks)),
        );
        root.insert("gpio_lines".into(), Value::Array(std::mem::take(&mut self.gpio_lines)));
        root.insert(
            "uart_interfaces".into(),
            Value::Array(std::mem::take(&mut self.uart_interfaces)),
        );
        root.insert(
            "i2c_interfaces".into(),
            Value::Array(std::mem::take(&mut self.i2c_interfaces)),
        );
        Ok(Value::Object(root))
    }
}

/// Render a model into a JSON context.
pub fn render_context(model: &ResolvedModel) -> Result<Value> {
    walk(model, &mut ContextSink::new())
}

pub(crate) fn clock_enable(symbol: &str) -> String {
    format!("__HAL_RCC_{symbol}_CLK_ENABLE()")
}

fn pin_context(pin: &ResolvedPin) -> Value {
    json!({
        "name": pin.pin.to_string(),
        "port": pin.pin.port().hal_name(),
        "pin": pin.pin.number(),
        "hal_pin": pin.pin.hal_pin(),
        "role": pin.role.name(),
        "mode": pin.mode.hal_constant(),
        "pull": pin.pull.hal_constant(),
        "speed": pin.speed.hal_constant(),
        "alternate_fn": pin.af,
        "label": pin.label,
    })
}

fn binding_context(binding: &AlternateFunctionBinding) -> Value {
    json!({
        "pin": binding.pin.to_string(),
        "role": binding.role.name(),
        "af": binding.af,
    })
}

fn params_context(params: &ResolvedParams, fields: &mut Map<String, Value>) {
    match params {
        ResolvedParams::Uart(p) => {
            fields.insert("baud_rate".into(), json!(p.baud_rate));
            fields.insert("word_length".into(), json!(p.word_length.hal_constant()));
            fields.insert("stop_bits".into(), json!(p.stop_bits.hal_constant()));
            fields.insert("parity".into(), json!(p.parity.hal_constant()));
            fields.insert("mode".into(), json!(p.direction.hal_constant()));
            fields.insert("hw_flow_ctl".into(), json!(p.flow_control.hal_constant()));
            fields.insert("oversampling".into(), json!(p.oversampling.hal_constant()));
        }
        ResolvedParams::I2c { params: p, timing } => {
            fields.insert("clock_speed_hz".into(), json!(p.clock_speed_hz));
            fields.insert("timing_reg".into(), json!(timing));
            fields.insert("addressing_mode".into(), json!(p.addressing_mode.hal_constant()));
            fields.insert("own_address1".into(), json!(p.hal_own_address1()));
            fields.insert("dual_address_mode".into(), json!(p.dual_address_constant()));
            fields.insert("own_address2".into(), json!(p.hal_own_address2()));
            fields.insert("own_address2_masks".into(), json!(p.own_address2_mask_constant()));
            fields.insert("general_call_mode".into(), json!(p.general_call_constant()));
            fields.insert("no_stretch_mode".into(), json!(p.no_stretch_constant()));
            fields.insert("analog_filter".into(), json!(p.analog_filter_constant()));
            fields.insert("digital_filter".into(), json!(p.digital_filter));
            let devices: Vec<Value> = p
                .devices
                .iter()
                .map(|d| json!({ "name": d.name, "address": format!("0x{:02X}", d.address) }))
                .collect();
            fields.insert("devices".into(), Value::Array(devices));
        }
        ResolvedParams::GpioLine(p) => {
            fields.insert("mode".into(), json!(p.mode.hal_constant()));
            fields.insert("alternate_fn".into(), json!(p.af));
        }
    }
}
