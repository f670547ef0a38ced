// Browser binding constants.
// Kept free of imports so host-side tests can `include!` this file.

// Bootstrap bookkeeping
pub const INITIALIZED_ATTR: &str = "data-ks-initialized";

// Visibility: fraction of the container that must intersect the viewport
pub const VISIBILITY_THRESHOLD: f64 = 0.1;

// Audio analysis
pub const ANALYSER_FFT_SIZE: u32 = 256; // yields 128 frequency bins
pub const AUDIO_CROSS_ORIGIN: &str = "anonymous";

// SVG namespace used to measure path descriptors
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

// Computed `transform` value meaning "no baseline"
pub const NO_TRANSFORM: &str = "none";

// DOM events
pub const EVENT_POINTER_ENTER: &str = "mouseenter";
pub const EVENT_POINTER_MOVE: &str = "mousemove";
pub const EVENT_POINTER_LEAVE: &str = "mouseleave";
pub const EVENT_SCROLL: &str = "scroll";

/// Number of frequency bins an analyser with `fft_size` reports.
pub const fn bin_count(fft_size: u32) -> u32 {
    fft_size / 2
}
