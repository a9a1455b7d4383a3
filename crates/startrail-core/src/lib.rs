pub mod astro;
pub mod consts;
pub mod error;
pub mod frame;
pub mod gate;
pub mod io;
pub mod mask;
pub mod metadata;
pub mod pipeline;
pub mod stack;
pub mod timelapse;
