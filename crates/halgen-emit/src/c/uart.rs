//! `uart.h` / `uart.c`: handles, init and transfer dispatch.

use std::fmt::Write as _;

use halgen_core::{PeripheralKind, TransferMode, UartParams};
use halgen_resolve::ResolvedParams;

use super::{
    check_hal_ok, close_header, dispatch, enable_clock, enable_irqs, GeneratedFile, Peripheral, Unit,
};
use crate::error::Result;

const GUARD: &str = "__UART_H";

const TRANSMIT: &str = "HAL_StatusTypeDef UART_Transmit(UART_HandleTypeDef *huart, uint8_t *data, uint16_t size, uint32_t timeout)";
const RECEIVE: &str = "HAL_StatusTypeDef UART_Receive(UART_HandleTypeDef *huart, uint8_t *buffer, uint16_t size, uint32_t timeout)";

type Uart<'a> = Peripheral<'a, &'a UartParams>;

pub(super) fn render(unit: &Unit<'_>) -> Result<[GeneratedFile; 2]> {
    let uarts = unit.peripherals(PeripheralKind::Uart, |params| match params {
        ResolvedParams::Uart(p) => Some(p),
        _ => None,
    })?;
    Ok([
        GeneratedFile::header("uart", header(unit, &uarts)?),
        GeneratedFile::source("uart", source(unit, &uarts)?),
    ])
}

fn header(unit: &Unit<'_>, uarts: &[Uart<'_>]) -> Result<String> {
    let mut out = String::new();
    unit.open_header(&mut out, GUARD)?;
    for uart in uarts {
        writeln!(out, "extern UART_HandleTypeDef {};", uart.handle)?;
    }
    writeln!(out)?;
    writeln!(out, "void MX_UART_Init(void);")?;
    writeln!(out, "{TRANSMIT};")?;
    writeln!(out, "{RECEIVE};")?;
    close_header(&mut out, GUARD)?;
    Ok(out)
}

fn source(unit: &Unit<'_>, uarts: &[Uart<'_>]) -> Result<String> {
    let mut out = String::new();
    unit.banner(&mut out)?;
    writeln!(out, "#include \"uart.h\"")?;
    writeln!(out)?;
    for uart in uarts {
        writeln!(out, "UART_HandleTypeDef {};", uart.handle)?;
    }
    writeln!(out)?;

    writeln!(out, "void MX_UART_Init(void)")?;
    writeln!(out, "{{")?;
    writeln!(out, "    /* Peripheral clocks */")?;
    for symbol in unit.instance_clocks(PeripheralKind::Uart) {
        enable_clock(&mut out, symbol)?;
    }
    for uart in uarts {
        let (h, p) = (&uart.handle, uart.params);
        writeln!(out)?;
        writeln!(out, "    /* {} ({}) */", uart.decl.instance, uart.decl.transfer_mode)?;
        writeln!(out, "    {h}.Instance = {};", uart.hal)?;
        writeln!(out, "    {h}.Init.BaudRate = {};", p.baud_rate)?;
        writeln!(out, "    {h}.Init.WordLength = {};", p.word_length.hal_constant())?;
        writeln!(out, "    {h}.Init.StopBits = {};", p.stop_bits.hal_constant())?;
        writeln!(out, "    {h}.Init.Parity = {};", p.parity.hal_constant())?;
        writeln!(out, "    {h}.Init.Mode = {};", p.direction.hal_constant())?;
        writeln!(out, "    {h}.Init.HwFlowCtl = {};", p.flow_control.hal_constant())?;
        writeln!(out, "    {h}.Init.OverSampling = {};", p.oversampling.hal_constant())?;
        check_hal_ok(&mut out, &format!("HAL_UART_Init(&{h})"))?;
        match uart.decl.transfer_mode {
            TransferMode::Interrupt => enable_irqs(&mut out, &uart.decl.irqs)?,
            TransferMode::Dma => {
                writeln!(out, "    /* DMA channels for {h} are linked by the application. */")?
            }
            TransferMode::Polling => {}
        }
    }
    writeln!(out, "}}")?;
    writeln!(out)?;

    // The timeout only reaches blocking HAL calls.
    let unused: &[&str] = if uarts.iter().any(|u| u.decl.transfer_mode.is_blocking()) {
        &[]
    } else {
        &["timeout"]
    };
    dispatch(&mut out, TRANSMIT, "huart", unused, uarts, |mode| match mode {
        TransferMode::Polling => "HAL_UART_Transmit(huart, data, size, timeout)".into(),
        other => format!("HAL_UART_Transmit{}(huart, data, size)", other.hal_suffix()),
    })?;
    writeln!(out)?;
    dispatch(&mut out, RECEIVE, "huart", unused, uarts, |mode| match mode {
        TransferMode::Polling => "HAL_UART_Receive(huart, buffer, size, timeout)".into(),
        other => format!("HAL_UART_Receive{}(huart, buffer, size)", other.hal_suffix()),
    })?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::super::emit_c;
    use super::super::tests::{board, file, resolve};
    use halgen_core::{PeripheralDeclaration, PinRef, Port, SignalRole, UartParams};

    #[test]
    fn init_and_clocks() {
        let files = emit_c(&resolve(&board())).unwrap();
        let c = file(&files, "Src/uart.c");
        assert!(c.contains("UART_HandleTypeDef huart1;\nUART_HandleTypeDef huart2;"));
        assert_eq!(c.matches("__HAL_RCC_USART1_CLK_ENABLE();").count(), 1);
        assert_eq!(c.matches("__HAL_RCC_USART2_CLK_ENABLE();").count(), 1);
        assert!(!c.contains("GPIOA_CLK"));
        assert!(c.contains("    huart1.Instance = USART1;\n    huart1.Init.BaudRate = 115200;"));
        assert!(c.contains("if (HAL_UART_Init(&huart2) != HAL_OK)"));
        assert!(c.contains("HAL_NVIC_EnableIRQ(USART2_IRQn);"));
        assert!(!c.contains("USART1_IRQn"));
    }

    #[test]
    fn dispatch_follows_transfer_mode() {
        let files = emit_c(&resolve(&board())).unwrap();
        let c = file(&files, "Src/uart.c");
        assert!(c.contains(
            "    if (huart->Instance == USART1)\n    {\n        return HAL_UART_Transmit(huart, data, size, timeout);"
        ));
        assert!(c.contains("return HAL_UART_Transmit_IT(huart, data, size);"));
        assert!(c.contains("return HAL_UART_Receive_IT(huart, buffer, size);"));
        assert_eq!(c.matches("return HAL_ERROR;").count(), 2);
        assert!(!c.contains("(void)timeout;"));
    }

    #[test]
    fn dma_only_discards_timeout() {
        let decls = [PeripheralDeclaration::uart("UART3", "dma", UartParams::default())
            .with_pin(PinRef::of(Port::B, 10), SignalRole::Tx)];
        let files = emit_c(&resolve(&decls)).unwrap();
        let c = file(&files, "Src/uart.c");
        assert!(c.contains("return HAL_UART_Transmit_DMA(huart, data, size);"));
        assert_eq!(c.matches("(void)timeout;").count(), 2);
        assert!(c.contains("/* DMA channels for huart3 are linked by the application. */"));
        let h = file(&files, "Inc/uart.h");
        assert!(h.contains("extern UART_HandleTypeDef huart3;"));
        assert!(h.contains("void MX_UART_Init(void);"));
    }
}
