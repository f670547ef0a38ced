use crate::constants::{ANALYSER_FFT_SIZE, AUDIO_CROSS_ORIGIN};
use kinesis_core::adapters::SpectrumSource;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

/// Hidden `<audio>` element routed through an analyser to the speakers.
pub struct AnalyserSpectrum {
    ctx: web::AudioContext,
    media: web::HtmlAudioElement,
    analyser: web::AnalyserNode,
    _source: web::MediaElementAudioSourceNode,
}

fn js_err(label: &str, e: wasm_bindgen::JsValue) -> anyhow::Error {
    anyhow::anyhow!("{label}: {:?}", e)
}

impl AnalyserSpectrum {
    pub fn new(
        document: &web::Document,
        container: &web::Element,
        uri: &str,
    ) -> anyhow::Result<Self> {
        let media: web::HtmlAudioElement = document
            .create_element("audio")
            .map_err(|e| js_err("create <audio>", e))?
            .dyn_into()
            .map_err(|_| anyhow::anyhow!("<audio> is not an HtmlAudioElement"))?;
        media.set_src(uri);
        media.set_cross_origin(Some(AUDIO_CROSS_ORIGIN));
        let _ = media.style().set_property("display", "none");
        container
            .append_child(&media)
            .map_err(|e| js_err("append <audio>", e))?;

        let ctx = web::AudioContext::new().map_err(|e| js_err("AudioContext", e))?;
        let analyser = ctx.create_analyser().map_err(|e| js_err("AnalyserNode", e))?;
        analyser.set_fft_size(ANALYSER_FFT_SIZE);
        let source = ctx
            .create_media_element_source(&media)
            .map_err(|e| js_err("MediaElementAudioSourceNode", e))?;
        source
            .connect_with_audio_node(&analyser)
            .map_err(|e| js_err("connect source", e))?;
        analyser
            .connect_with_audio_node(&ctx.destination())
            .map_err(|e| js_err("connect analyser", e))?;
        log::info!(
            "[audio] analyser ready: {} bins for {uri}",
            analyser.frequency_bin_count()
        );
        Ok(Self {
            ctx,
            media,
            analyser,
            _source: source,
        })
    }
}

impl SpectrumSource for AnalyserSpectrum {
    fn bin_count(&self) -> usize {
        self.analyser.frequency_bin_count() as usize
    }

    fn read(&mut self, out: &mut [u8]) {
        self.analyser.get_byte_frequency_data(out);
    }

    fn play(&mut self) {
        let _ = self.ctx.resume();
        match self.media.play() {
            Ok(promise) => spawn_local(async move {
                // Autoplay policies reject until the page has seen a gesture.
                if let Err(e) = JsFuture::from(promise).await {
                    log::warn!("[audio] play rejected: {:?}", e);
                }
            }),
            Err(e) => log::warn!("[audio] play: {:?}", e),
        }
    }

    fn pause(&mut self) {
        let _ = self.media.pause();
    }

    fn rewind(&mut self) {
        self.media.set_current_time(0.0);
    }

    fn set_source(&mut self, uri: &str) {
        self.media.set_src(uri);
    }
}

impl Drop for AnalyserSpectrum {
    fn drop(&mut self) {
        let _ = self.media.pause();
        self.media.remove();
        let _ = self.ctx.close();
    }
}
