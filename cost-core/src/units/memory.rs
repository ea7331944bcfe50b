use crate::error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryScope {
    /// Absolute amount for the whole job.
    Job,
    /// Trailing `c`: amount per allocated core.
    PerCore,
    /// Trailing `n`: amount per node.
    PerNode,
}

impl MemoryScope {
    pub fn multiplier(&self, cores: f64, nodes: f64) -> f64 {
        match self {
            MemoryScope::Job => 1.0,
            MemoryScope::PerCore => cores,
            MemoryScope::PerNode => nodes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryUnit {
    Kilobytes,
    Megabytes,
    Gigabytes,
    Terabytes,
}

impl MemoryUnit {
    fn from_suffix(c: char) -> Option<Self> {
        match c {
            'K' => Some(MemoryUnit::Kilobytes),
            'M' => Some(MemoryUnit::Megabytes),
            'G' => Some(MemoryUnit::Gigabytes),
            'T' => Some(MemoryUnit::Terabytes),
            _ => None,
        }
    }

    /// Convert an amount in this unit to gigabytes.
    pub fn to_gigabytes(&self, amount: f64) -> f64 {
        match self {
            MemoryUnit::Kilobytes => amount / 1_000_000.0,
            MemoryUnit::Megabytes => amount / 1000.0,
            MemoryUnit::Gigabytes => amount,
            MemoryUnit::Terabytes => amount * 1000.0,
        }
    }
}

/// Parse a memory value into gigabytes, resolving per-core and per-node
/// scopes against the job's allocation.
///
/// A value is a decimal magnitude followed by an optional unit letter and an
/// optional scope letter: `4Gc` (4 GB per core), `500Mn` (500 MB per node),
/// `2T`, `1024K` or a bare `8`. Units are decimal, 1 GB = 1000 MB.
///
/// Absolute values (such as `MaxRSS`) should be parsed with
/// `cores = nodes = 1.0`.
pub fn parse_gigabytes(value: &str, cores: f64, nodes: f64) -> Result<f64, ParseError> {
    let text = value.trim();

    let (scope, rest) = match text.chars().last() {
        Some('c') => (MemoryScope::PerCore, &text[..text.len() - 1]),
        Some('n') => (MemoryScope::PerNode, &text[..text.len() - 1]),
        _ => (MemoryScope::Job, text),
    };

    let (unit, magnitude) = match rest.chars().last().and_then(MemoryUnit::from_suffix) {
        Some(unit) => (unit, &rest[..rest.len() - 1]),
        None => (MemoryUnit::Gigabytes, rest),
    };

    let amount = magnitude.parse::<f64>().map_err(|_| ParseError::Memory {
        field: "memory",
        value: value.to_string(),
        reason: format!("{:?} is not a number", magnitude),
    })?;

    Ok(unit.to_gigabytes(amount * scope.multiplier(cores, nodes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_core() {
        assert_eq!(parse_gigabytes("4Gc", 8.0, 1.0).unwrap(), 32.0);
        assert_eq!(parse_gigabytes("500Mc", 4.0, 2.0).unwrap(), 2.0);
    }

    #[test]
    fn test_per_node() {
        assert_eq!(parse_gigabytes("500Mn", 4.0, 2.0).unwrap(), 1.0);
        assert_eq!(parse_gigabytes("64Gn", 16.0, 3.0).unwrap(), 192.0);
    }

    #[test]
    fn test_units() {
        assert_eq!(parse_gigabytes("16000M", 1.0, 1.0).unwrap(), 16.0);
        assert_eq!(parse_gigabytes("2T", 1.0, 1.0).unwrap(), 2000.0);
        assert_eq!(parse_gigabytes("2500000K", 1.0, 1.0).unwrap(), 2.5);
        assert_eq!(parse_gigabytes("12G", 1.0, 1.0).unwrap(), 12.0);
    }

    #[test]
    fn test_bare_number_is_gigabytes() {
        assert_eq!(parse_gigabytes("8", 1.0, 1.0).unwrap(), 8.0);
        assert_eq!(parse_gigabytes("0", 1.0, 1.0).unwrap(), 0.0);
    }

    #[test]
    fn test_scope_without_unit() {
        assert_eq!(parse_gigabytes("3c", 4.0, 1.0).unwrap(), 12.0);
    }

    #[test]
    fn test_rejects_non_numeric() {
        assert!(parse_gigabytes("", 1.0, 1.0).is_err());
        assert!(parse_gigabytes("G", 1.0, 1.0).is_err());
        assert!(parse_gigabytes("lotsG", 1.0, 1.0).is_err());
        assert!(parse_gigabytes("4GB", 1.0, 1.0).is_err());

        let err = parse_gigabytes("4Xc", 2.0, 1.0).unwrap_err();
        assert_eq!(err.value(), Some("4Xc"));
    }
}
