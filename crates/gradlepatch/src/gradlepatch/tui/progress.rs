use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use once_cell::sync::Lazy;

pub static GLOBAL_MP: Lazy<MultiProgress> = Lazy::new(MultiProgress::new);

const BAR_TEMPLATE: &str =
    "{msg}\n{bar:40.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, {eta})";
const UNSIZED_TEMPLATE: &str = "{spinner:.cyan} {msg} {bytes} ({bytes_per_sec})";

pub fn create_spinner(message: impl Into<String>) -> ProgressBar {
    let pb = GLOBAL_MP.add(ProgressBar::new_spinner());
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["◜", "◠", "◝", "◞", "◡", "◟"])
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.into());
    pb
}

/// Byte counter for a download. A `total` of `None` (no usable
/// `Content-Length`) falls back to a spinner that only counts bytes.
pub fn create_bytes_progress(message: impl Into<String>, total: Option<u64>) -> ProgressBar {
    let pb = match total {
        Some(len) => {
            let pb = GLOBAL_MP.add(ProgressBar::new(len));
            pb.set_style(
                ProgressStyle::default_bar()
                    .progress_chars("##-")
                    .template(BAR_TEMPLATE)
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            pb
        }
        None => {
            let pb = GLOBAL_MP.add(ProgressBar::new_spinner());
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template(UNSIZED_TEMPLATE)
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb
        }
    };
    pb.set_message(message.into());
    pb
}
