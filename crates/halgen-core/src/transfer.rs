//! Transfer modes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a peripheral instance moves data.
///
/// Only these three tags are recognized. Declarations keep the raw tag text so
/// that an unrecognized tag can be reported instead of replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferMode {
    Polling,
    Interrupt,
    Dma,
}

impl TransferMode {
    /// Parse a transfer-mode tag, ignoring ASCII case and surrounding whitespace.
    ///
    /// Returns `None` for anything other than `polling`, `interrupt` or `dma`.
    pub fn parse(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        if tag.eq_ignore_ascii_case("polling") {
            Some(TransferMode::Polling)
        } else if tag.eq_ignore_ascii_case("interrupt") {
            Some(TransferMode::Interrupt)
        } else if tag.eq_ignore_ascii_case("dma") {
            Some(TransferMode::Dma)
        } else {
            None
        }
    }

    /// Canonical upper-case tag.
    pub fn tag(&self) -> &'static str {
        match self {
            TransferMode::Polling => "POLLING",
            TransferMode::Interrupt => "INTERRUPT",
            TransferMode::Dma => "DMA",
        }
    }

    /// Suffix the STM32 HAL appends to non-blocking calls (`_IT`, `_DMA`).
    pub fn hal_suffix(&self) -> &'static str {
        match self {
            TransferMode::Polling => "",
            TransferMode::Interrupt => "_IT",
            TransferMode::Dma => "_DMA",
        }
    }

    /// Whether the mode is blocking and therefore takes a timeout argument.
    pub fn is_blocking(&self) -> bool {
        matches!(self, TransferMode::Polling)
    }
}

impl fmt::Display for TransferMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_recognized_tags() {
        assert_eq!(TransferMode::parse("POLLING"), Some(TransferMode::Polling));
        assert_eq!(TransferMode::parse("Interrupt"), Some(TransferMode::Interrupt));
        assert_eq!(TransferMode::parse(" dma "), Some(TransferMode::Dma));
    }

    #[test]
    fn unrecognized_tags_are_not_defaulted() {
        assert_eq!(TransferMode::parse("BURST"), None);
        assert_eq!(TransferMode::parse(""), None);
        assert_eq!(TransferMode::parse("poll"), None);
        assert_eq!(TransferMode::parse("IT"), None);
    }

    #[test]
    fn hal_suffixes() {
        assert_eq!(TransferMode::Polling.hal_suffix(), "");
        assert_eq!(TransferMode::Interrupt.hal_suffix(), "_IT");
        assert_eq!(TransferMode::Dma.hal_suffix(), "_DMA");
        assert!(TransferMode::Polling.is_blocking());
        assert!(!TransferMode::Dma.is_blocking());
    }
}
