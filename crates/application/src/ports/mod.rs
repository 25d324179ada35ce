//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod audio_store_port;
mod inference_port;
mod speech_port;

#[cfg(test)]
pub use audio_store_port::MockAudioStorePort;
pub use audio_store_port::{AudioStorePort, StoredAudio};
#[cfg(test)]
pub use inference_port::MockInferencePort;
pub use inference_port::{InferencePort, InferenceResult};
#[cfg(test)]
pub use speech_port::{MockSynthesisPort, MockTranscriptionPort};
pub use speech_port::{
    ChannelLayout, SynthesisOptions, SynthesisPort, SynthesisResult, TranscriptionPort,
    TranscriptionResult,
};
