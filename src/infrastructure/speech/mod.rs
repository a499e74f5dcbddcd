mod http_speech_synthesizer;

pub use http_speech_synthesizer::{HttpSpeechSynthesizer, classify_speech_failure};
