pub mod gpu;
pub mod raster;
pub mod text_measurer;
