// Purpose: the voice pool, per-voice envelopes and the bank-wide parameters
// they read while rendering.

pub mod active_list;
pub mod bank;
pub mod message;
pub mod params;
pub mod voice;

pub use bank::VoiceBank;
pub use message::SynthMessage;
pub use params::{GlobalParams, ParamAddress};
pub use voice::{EnvStage, RenderCtx, Voice};
