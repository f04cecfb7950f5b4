use std::fmt::{self, Display};

/// bytes in a gigabyte.
const GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// memory totals, in bytes, as the operating system reports them.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RawMemory {
    pub ram_total: u64,
    pub ram_free: u64,
    pub swap_total: u64,
    pub swap_free: u64,
}

/// physical and virtual memory use, in gigabytes.
///
/// virtual memory is physical memory plus swap, so `virtual_total >= physical_total`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MemoryReading {
    pub physical_used: f64,
    pub physical_total: f64,
    pub virtual_used: f64,
    pub virtual_total: f64,
}

// === impl MemoryReading ===

impl From<RawMemory> for MemoryReading {
    fn from(
        RawMemory {
            ram_total,
            ram_free,
            swap_total,
            swap_free,
        }: RawMemory,
    ) -> Self {
        let gb = |bytes: u64| bytes as f64 / GB;

        let physical_used = gb(ram_total.saturating_sub(ram_free));
        let swap_used = gb(swap_total.saturating_sub(swap_free));

        Self {
            physical_used,
            physical_total: gb(ram_total),
            virtual_used: physical_used + swap_used,
            virtual_total: gb(ram_total.saturating_add(swap_total)),
        }
    }
}

/// formats the reading as a history row.
impl Display for MemoryReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            physical_used,
            physical_total,
            virtual_used,
            virtual_total,
        } = self;

        write!(
            f,
            "{physical_used:.2} GB / {physical_total:.2} GB -- {virtual_used:.2} GB / {virtual_total:.2} GB"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GIB: u64 = 1024 * 1024 * 1024;

    #[test]
    fn from_raw() {
        let reading = MemoryReading::from(RawMemory {
            ram_total: 8 * GIB,
            ram_free: 6 * GIB,
            swap_total: 2 * GIB,
            swap_free: GIB,
        });

        assert_eq!(
            reading,
            MemoryReading {
                physical_used: 2.0,
                physical_total: 8.0,
                virtual_used: 3.0,
                virtual_total: 10.0,
            }
        );
        assert!(reading.virtual_total >= reading.physical_total);
    }

    #[test]
    fn no_swap() {
        let reading = MemoryReading::from(RawMemory {
            ram_total: 4 * GIB,
            ram_free: GIB,
            swap_total: 0,
            swap_free: 0,
        });

        assert_eq!(reading.virtual_used, reading.physical_used);
        assert_eq!(reading.virtual_total, reading.physical_total);
    }

    #[test]
    fn row() {
        let reading = MemoryReading {
            physical_used: 3.456,
            physical_total: 15.5,
            virtual_used: 4.0,
            virtual_total: 17.5,
        };

        assert_eq!(
            reading.to_string(),
            "3.46 GB / 15.50 GB -- 4.00 GB / 17.50 GB"
        );
    }
}
