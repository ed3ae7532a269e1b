//! Core kernel traits.
//!
//! Two traits define the seam between engines and callers:
//! - [`ComputeKernel`]: base trait exposing metadata
//! - [`BatchKernel`]: synchronous batch computation over one input snapshot
//!
//! Every kernel is a stateless pure function over its input plus its
//! configuration value; concurrent invocations with independent inputs never
//! interfere and require no locking. There is no internal suspension or
//! cancellation: callers needing timeouts impose them around the whole call.

use crate::error::Result;
use crate::kernel::KernelMetadata;

/// Base trait for all kernels.
pub trait ComputeKernel {
    /// Kernel metadata for registry and catalog use.
    fn metadata(&self) -> &KernelMetadata;
}

/// Trait for batch kernels.
///
/// A batch kernel consumes one immutable input snapshot and produces a
/// complete result or an error; there are no partial results.
pub trait BatchKernel: ComputeKernel {
    /// Input batch type.
    type Input;
    /// Complete result type.
    type Output;

    /// Execute the kernel over one batch.
    fn execute(&self, input: &Self::Input) -> Result<Self::Output>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Domain;
    use crate::error::KernelError;

    struct DoubleKernel {
        metadata: KernelMetadata,
    }

    impl ComputeKernel for DoubleKernel {
        fn metadata(&self) -> &KernelMetadata {
            &self.metadata
        }
    }

    impl BatchKernel for DoubleKernel {
        type Input = Vec<f64>;
        type Output = Vec<f64>;

        fn execute(&self, input: &Self::Input) -> Result<Self::Output> {
            if input.is_empty() {
                return Err(KernelError::validation("empty batch"));
            }
            Ok(input.iter().map(|x| x * 2.0).collect())
        }
    }

    #[test]
    fn test_batch_kernel_execute() {
        let kernel = DoubleKernel {
            metadata: KernelMetadata::batch("core/double", Domain::Core),
        };
        let out = kernel.execute(&vec![1.0, 2.5]).unwrap();
        assert_eq!(out, vec![2.0, 5.0]);
        assert!(kernel.execute(&vec![]).is_err());
    }
}
