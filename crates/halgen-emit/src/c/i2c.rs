//! `i2c.h` / `i2c.c`: handles, init, device addresses and transfer dispatch.

use std::fmt::Write as _;

use halgen_core::{I2cParams, PeripheralKind, TransferMode};
use halgen_resolve::ResolvedParams;

use super::{
    check_hal_ok, close_header, dispatch, enable_clock, enable_irqs, GeneratedFile, Peripheral, Unit,
};
use crate::error::Result;

const GUARD: &str = "__I2C_H";

/// A bus with its parameters and timing-register preset.
type Bus<'a> = Peripheral<'a, (&'a I2cParams, &'a str)>;

const WRITE: &str = "HAL_StatusTypeDef I2C_Write(I2C_HandleTypeDef *hi2c, uint16_t dev_address, uint8_t *data, uint16_t size)";
const READ: &str = "HAL_StatusTypeDef I2C_Read(I2C_HandleTypeDef *hi2c, uint16_t dev_address, uint8_t *buffer, uint16_t size)";
const READ_REGISTER: &str = "HAL_StatusTypeDef I2C_Read_Register(I2C_HandleTypeDef *hi2c, uint16_t dev_address, uint8_t reg_address, uint8_t *buffer)";
const WRITE_REGISTER: &str = "HAL_StatusTypeDef I2C_Write_Register(I2C_HandleTypeDef *hi2c, uint16_t dev_address, uint8_t reg_address, uint8_t value)";

pub(super) fn render(unit: &Unit<'_>) -> Result<[GeneratedFile; 2]> {
    let buses = unit.peripherals(PeripheralKind::I2c, |params| match params {
        ResolvedParams::I2c { params, timing } => Some((params, timing.as_str())),
        _ => None,
    })?;
    Ok([
        GeneratedFile::header("i2c", header(unit, &buses)?),
        GeneratedFile::source("i2c", source(unit, &buses)?),
    ])
}

fn header(unit: &Unit<'_>, buses: &[Bus<'_>]) -> Result<String> {
    let mut out = String::new();
    unit.open_header(&mut out, GUARD)?;

    let mut any_device = false;
    for bus in buses {
        for device in &bus.params.0.devices {
            if !any_device {
                writeln!(out, "/* Slave device addresses, shifted for the HAL */")?;
                any_device = true;
            }
            writeln!(
                out,
                "#define {} (0x{:02X}U << 1) /* on {} */",
                device.name, device.address, bus.decl.instance
            )?;
        }
    }
    if any_device {
        writeln!(out)?;
    }

    for bus in buses {
        writeln!(out, "extern I2C_HandleTypeDef {};", bus.handle)?;
    }
    writeln!(out)?;
    writeln!(out, "void MX_I2C_Init(void);")?;
    for signature in [WRITE, READ, READ_REGISTER, WRITE_REGISTER] {
        writeln!(out, "{signature};")?;
    }
    close_header(&mut out, GUARD)?;
    Ok(out)
}

fn source(unit: &Unit<'_>, buses: &[Bus<'_>]) -> Result<String> {
    let mut out = String::new();
    unit.banner(&mut out)?;
    writeln!(out, "#include \"i2c.h\"")?;
    writeln!(out)?;
    for bus in buses {
        writeln!(out, "I2C_HandleTypeDef {};", bus.handle)?;
    }
    writeln!(out)?;

    writeln!(out, "void MX_I2C_Init(void)")?;
    writeln!(out, "{{")?;
    writeln!(out, "    /* Peripheral clocks */")?;
    for symbol in unit.instance_clocks(PeripheralKind::I2c) {
        enable_clock(&mut out, symbol)?;
    }
    for bus in buses {
        let (h, (p, timing)) = (&bus.handle, bus.params);
        writeln!(out)?;
        writeln!(
            out,
            "    /* {} ({}, {} Hz) */",
            bus.decl.instance, bus.decl.transfer_mode, p.clock_speed_hz
        )?;
        writeln!(out, "    {h}.Instance = {};", bus.hal)?;
        writeln!(out, "    {h}.Init.Timing = {timing};")?;
        writeln!(out, "    {h}.Init.OwnAddress1 = {};", p.hal_own_address1())?;
        writeln!(out, "    {h}.Init.AddressingMode = {};", p.addressing_mode.hal_constant())?;
        writeln!(out, "    {h}.Init.DualAddressMode = {};", p.dual_address_constant())?;
        writeln!(out, "    {h}.Init.OwnAddress2 = {};", p.hal_own_address2())?;
        writeln!(out, "    {h}.Init.OwnAddress2Masks = {};", p.own_address2_mask_constant())?;
        writeln!(out, "    {h}.Init.GeneralCallMode = {};", p.general_call_constant())?;
        writeln!(out, "    {h}.Init.NoStretchMode = {};", p.no_stretch_constant())?;
        check_hal_ok(&mut out, &format!("HAL_I2C_Init(&{h})"))?;
        check_hal_ok(
            &mut out,
            &format!("HAL_I2CEx_ConfigAnalogFilter(&{h}, {})", p.analog_filter_constant()),
        )?;
        check_hal_ok(
            &mut out,
            &format!("HAL_I2CEx_ConfigDigitalFilter(&{h}, {})", p.digital_filter),
        )?;
        match bus.decl.transfer_mode {
            TransferMode::Interrupt => enable_irqs(&mut out, &bus.decl.irqs)?,
            TransferMode::Dma => {
                writeln!(out, "    /* DMA channels for {h} are linked by the application. */")?
            }
            TransferMode::Polling => {}
        }
    }
    writeln!(out, "}}")?;
    writeln!(out)?;

    dispatch(&mut out, WRITE, "hi2c", &[], buses, |mode| match mode {
        TransferMode::Polling => {
            "HAL_I2C_Master_Transmit(hi2c, dev_address, data, size, HAL_MAX_DELAY)".into()
        }
        other => format!(
            "HAL_I2C_Master_Transmit{}(hi2c, dev_address, data, size)",
            other.hal_suffix()
        ),
    })?;
    writeln!(out)?;
    dispatch(&mut out, READ, "hi2c", &[], buses, |mode| match mode {
        TransferMode::Polling => {
            "HAL_I2C_Master_Receive(hi2c, dev_address, buffer, size, HAL_MAX_DELAY)".into()
        }
        other => format!(
            "HAL_I2C_Master_Receive{}(hi2c, dev_address, buffer, size)",
            other.hal_suffix()
        ),
    })?;
    writeln!(out)?;
    register_helpers(&mut out)?;
    Ok(out)
}

/// Blocking single-register access, independent of the bus transfer mode.
fn register_helpers(out: &mut String) -> std::fmt::Result {
    writeln!(out, "{READ_REGISTER}")?;
    writeln!(out, "{{")?;
    writeln!(
        out,
        "    if (HAL_I2C_Master_Transmit(hi2c, dev_address, &reg_address, 1, HAL_MAX_DELAY) != HAL_OK)"
    )?;
    writeln!(out, "    {{")?;
    writeln!(out, "        return HAL_ERROR;")?;
    writeln!(out, "    }}")?;
    writeln!(
        out,
        "    return HAL_I2C_Master_Receive(hi2c, dev_address, buffer, 1, HAL_MAX_DELAY);"
    )?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    writeln!(out, "{WRITE_REGISTER}")?;
    writeln!(out, "{{")?;
    writeln!(out, "    uint8_t data[2] = {{reg_address, value}};")?;
    writeln!(
        out,
        "    return HAL_I2C_Master_Transmit(hi2c, dev_address, data, 2, HAL_MAX_DELAY);"
    )?;
    writeln!(out, "}}")
}
