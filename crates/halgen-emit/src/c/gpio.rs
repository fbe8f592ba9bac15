//! `gpio.h` / `gpio.c`: port clocks and pin configuration.

use std::fmt::Write as _;

use halgen_resolve::{ClockDomain, ResolvedPin};

use super::{close_header, enable_clock, GeneratedFile, Unit};
use crate::error::Result;

const GUARD: &str = "__GPIO_H";

pub(super) fn render(unit: &Unit<'_>) -> Result<[GeneratedFile; 2]> {
    Ok([
        GeneratedFile::header("gpio", header(unit)?),
        GeneratedFile::source("gpio", source(unit)?),
    ])
}

fn header(unit: &Unit<'_>) -> Result<String> {
    let mut out = String::new();
    unit.open_header(&mut out, GUARD)?;

    let labelled: Vec<(&str, &ResolvedPin)> = unit
        .declarations
        .iter()
        .flat_map(|d| d.pins.iter())
        .filter_map(|p| Some((p.label.as_deref()?, p)))
        .collect();
    for (label, pin) in &labelled {
        writeln!(out, "#define {label}_Pin {}", pin.pin.hal_pin())?;
        writeln!(out, "#define {label}_GPIO_Port {}", pin.pin.port().hal_name())?;
    }
    if !labelled.is_empty() {
        writeln!(out)?;
    }

    writeln!(out, "void MX_GPIO_Init(void);")?;
    close_header(&mut out, GUARD)?;
    Ok(out)
}

fn source(unit: &Unit<'_>) -> Result<String> {
    let mut out = String::new();
    unit.banner(&mut out)?;
    writeln!(out, "#include \"gpio.h\"")?;
    writeln!(out)?;
    writeln!(out, "void MX_GPIO_Init(void)")?;
    writeln!(out, "{{")?;
    writeln!(out, "    GPIO_InitTypeDef GPIO_InitStruct = {{0}};")?;
    writeln!(out)?;
    writeln!(out, "    /* GPIO port clocks */")?;
    for clock in unit.clocks {
        if let ClockDomain::Port { symbol, .. } = clock {
            enable_clock(&mut out, symbol)?;
        }
    }

    for decl in unit.declarations {
        for pin in &decl.pins {
            writeln!(out)?;
            let name = pin.label.as_deref().unwrap_or(decl.instance.as_str());
            writeln!(out, "    /* {name} {}: {} */", pin.role, pin.pin)?;
            configure_pin(&mut out, pin)?;
        }
    }
    writeln!(out, "}}")?;
    Ok(out)
}

fn configure_pin(out: &mut String, pin: &ResolvedPin) -> std::fmt::Result {
    let port = pin.pin.port().hal_name();
    let hal_pin = pin.pin.hal_pin();
    if pin.mode.is_output() {
        writeln!(out, "    HAL_GPIO_WritePin({port}, {hal_pin}, GPIO_PIN_RESET);")?;
    }
    writeln!(out, "    GPIO_InitStruct.Pin = {hal_pin};")?;
    writeln!(out, "    GPIO_InitStruct.Mode = {};", pin.mode.hal_constant())?;
    writeln!(out, "    GPIO_InitStruct.Pull = {};", pin.pull.hal_constant())?;
    writeln!(out, "    GPIO_InitStruct.Speed = {};", pin.speed.hal_constant())?;
    if let Some(af) = pin.af {
        writeln!(out, "    GPIO_InitStruct.Alternate = {af};")?;
    }
    writeln!(out, "    HAL_GPIO_Init({port}, &GPIO_InitStruct);")
}

#[cfg(test)]
mod tests {
    use super::super::tests::{board, file, resolve};
    use super::super::emit_c;

    #[test]
    fn each_port_clock_once() {
        let files = emit_c(&resolve(&board())).unwrap();
        let gpio = file(&files, "Src/gpio.c");
        assert_eq!(gpio.matches("__HAL_RCC_GPIOA_CLK_ENABLE();").count(), 1);
        assert_eq!(gpio.matches("__HAL_RCC_GPIOB_CLK_ENABLE();").count(), 1);
        let a = gpio.find("GPIOA_CLK").unwrap();
        let b = gpio.find("GPIOB_CLK").unwrap();
        assert!(a < b);
        assert!(!gpio.contains("USART1_CLK"));
    }

    #[test]
    fn pins_configured_in_declaration_order() {
        let files = emit_c(&resolve(&board())).unwrap();
        let gpio = file(&files, "Src/gpio.c");
        assert_eq!(gpio.matches("HAL_GPIO_Init(").count(), 7);
        let tx = gpio.find("/* UART1 TX: PA9 */").unwrap();
        let scl = gpio.find("/* I2C1 SCL: PB8 */").unwrap();
        let led = gpio.find("/* LED_GREEN LINE: PA5 */").unwrap();
        assert!(tx < scl && scl < led);
        assert!(gpio.contains("    GPIO_InitStruct.Mode = GPIO_MODE_AF_OD;\n    GPIO_InitStruct.Pull = GPIO_PULLUP;"));
        assert!(gpio.contains("HAL_GPIO_WritePin(GPIOA, GPIO_PIN_5, GPIO_PIN_RESET);"));
        assert!(gpio.contains("GPIO_InitStruct.Alternate = 4;"));
    }

    #[test]
    fn labels_become_defines() {
        let files = emit_c(&resolve(&board())).unwrap();
        let h = file(&files, "Inc/gpio.h");
        assert!(h.contains("#define LED_GREEN_Pin GPIO_PIN_5\n#define LED_GREEN_GPIO_Port GPIOA"));
        assert!(h.contains("#include \"stm32g4xx_hal.h\""));
        assert!(h.trim_end().ends_with("#endif /* __GPIO_H */"));
    }
}
