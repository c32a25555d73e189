//! Per-packet gas metering.
//!
//! One [`GasMeter`] is created for each packet and threaded through every
//! query of its batch. Exceeding the limit yields [`OutOfGas`], which the host
//! turns into an aborted packet rather than an error acknowledgement.

use crate::error::OutOfGas;

/// Gas charged for a query even when its handler reads nothing
pub const DEFAULT_GAS_PER_QUERY: u64 = 1_000;

/// Bounded gas counter shared by all queries of one packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasMeter {
    limit: u64,
    consumed: u64,
}

impl GasMeter {
    pub fn new(limit: u64) -> Self {
        Self { limit, consumed: 0 }
    }

    /// Charge `amount` gas.
    ///
    /// The meter may be consumed up to exactly its limit. Going past it
    /// records the overrun and returns `OutOfGas`; the meter stays exhausted.
    pub fn consume_gas(&mut self, amount: u64, descriptor: &str) -> Result<(), OutOfGas> {
        let consumed = self.consumed.saturating_add(amount);
        self.consumed = consumed;

        if consumed > self.limit {
            return Err(OutOfGas {
                descriptor: descriptor.to_string(),
                limit: self.limit,
                used: consumed,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn limit(&self) -> u64 {
        self.limit
    }

    #[inline]
    pub fn gas_consumed(&self) -> u64 {
        self.consumed
    }

    /// Gas consumed, capped at the limit
    #[inline]
    pub fn gas_consumed_to_limit(&self) -> u64 {
        self.consumed.min(self.limit)
    }

    #[inline]
    pub fn gas_remaining(&self) -> u64 {
        self.limit.saturating_sub(self.consumed)
    }

    #[inline]
    pub fn is_out_of_gas(&self) -> bool {
        self.consumed > self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consume_within_limit() {
        let mut meter = GasMeter::new(100);
        assert!(meter.consume_gas(40, "a").is_ok());
        assert!(meter.consume_gas(60, "b").is_ok());
        assert_eq!(meter.gas_remaining(), 0);
        assert!(!meter.is_out_of_gas());
    }

    #[test]
    fn test_overrun_reports_out_of_gas() {
        let mut meter = GasMeter::new(100);
        meter.consume_gas(90, "a").ok();
        let err = meter.consume_gas(20, "b").err();
        assert_eq!(
            err,
            Some(OutOfGas {
                descriptor: "b".to_string(),
                limit: 100,
                used: 110
            })
        );
        assert!(meter.is_out_of_gas());
        assert_eq!(meter.gas_consumed_to_limit(), 100);
        // stays exhausted
        assert!(meter.consume_gas(0, "c").is_err());
    }

    #[test]
    fn test_saturating_consumption() {
        let mut meter = GasMeter::new(u64::MAX);
        meter.consume_gas(u64::MAX, "a").ok();
        assert!(meter.consume_gas(1, "b").is_ok());
        assert_eq!(meter.gas_consumed(), u64::MAX);
    }
}
