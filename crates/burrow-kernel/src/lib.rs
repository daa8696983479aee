pub mod mesh_kernel;
pub mod mock_kernel;
pub mod traits;
pub mod types;

pub use mesh_kernel::MeshKernel;
pub use mock_kernel::{KernelCall, MockKernel};
pub use traits::*;
pub use types::*;
