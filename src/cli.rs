use crate::enums::ResizePolicy;
use crate::series_selector::DEFAULT_SERIES_DESCRIPTION;

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for hippo-volume
#[derive(Parser, Debug)]
#[command(name = "hippo-volume")]
#[command(about = "Segment the newest routed hippocampus study and send a DICOM report to the archive")]
#[command(version)]
pub struct Cli {
    /// Routing directory holding one subdirectory per study
    #[arg(value_name = "ROUTING_DIR")]
    pub routing_dir: PathBuf,

    /// Where the Secondary Capture report is written
    #[arg(short, long, default_value = "out/report.dcm")]
    pub output: PathBuf,

    /// Exact Series Description of the series to segment
    #[arg(long, default_value = DEFAULT_SERIES_DESCRIPTION)]
    pub series_description: String,

    /// Font used for report text (defaults to bundled/system fonts)
    #[arg(long, value_name = "FILE")]
    pub font: Option<PathBuf>,

    /// Edge length of the square model input patch
    #[arg(long, default_value_t = 64)]
    pub patch_size: usize,

    /// How slices are fitted to the model patch
    #[arg(long, default_value = "resample")]
    pub resize_policy: ResizePolicyArg,

    /// Also save the report raster as an image (format from extension)
    #[arg(long, value_name = "FILE")]
    pub preview: Option<PathBuf>,

    /// storescu executable
    #[arg(long, default_value = "storescu")]
    pub storescu: PathBuf,

    /// Archive host
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Archive port
    #[arg(long, default_value_t = 4242)]
    pub port: u16,

    /// Called AE title of the archive
    #[arg(long, default_value = "HIPPOAI")]
    pub aec: String,

    /// Do not send the report
    #[arg(long)]
    pub no_transport: bool,

    /// Do not delete the study directory afterwards
    #[arg(long)]
    pub keep_study: bool,

    /// Seconds to wait after sending before deleting the study
    #[arg(long, default_value_t = 2)]
    pub cleanup_delay_secs: u64,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Resize policy options
#[derive(Debug, Clone, ValueEnum)]
pub enum ResizePolicyArg {
    /// Resample slices onto the patch and labels back
    Resample,
    /// Zero-pad or crop slices to the patch
    PadCrop,
}

impl From<ResizePolicyArg> for ResizePolicy {
    fn from(arg: ResizePolicyArg) -> Self {
        match arg {
            ResizePolicyArg::Resample => ResizePolicy::Resample,
            ResizePolicyArg::PadCrop => ResizePolicy::PadCrop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_exactly_one_routing_dir() {
        assert!(Cli::try_parse_from(["hippo-volume"]).is_err());
        assert!(Cli::try_parse_from(["hippo-volume", "a", "b"]).is_err());
    }

    #[test]
    fn defaults_match_archive_setup() {
        let cli = Cli::try_parse_from(["hippo-volume", "/routing"]).unwrap();

        assert_eq!(cli.routing_dir, PathBuf::from("/routing"));
        assert_eq!(cli.series_description, "HippoCrop");
        assert_eq!(cli.port, 4242);
        assert_eq!(cli.aec, "HIPPOAI");
        assert_eq!(cli.cleanup_delay_secs, 2);
        assert_eq!(ResizePolicy::from(cli.resize_policy), ResizePolicy::Resample);
    }

    #[test]
    fn parses_pad_crop_policy() {
        let cli =
            Cli::try_parse_from(["hippo-volume", "/routing", "--resize-policy", "pad-crop"]).unwrap();
        assert_eq!(ResizePolicy::from(cli.resize_policy), ResizePolicy::PadCrop);
    }
}
