pub mod carbon_intensity;
pub mod recorded_file;

pub use carbon_intensity::CarbonIntensitySource;
pub use recorded_file::RecordedFileSource;
