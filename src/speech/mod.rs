pub mod echo;
pub mod listener;
pub mod normalize;
pub mod output;

pub use echo::{is_self_echo, PhraseLog};
pub use listener::{SpeechListener, UtteranceSource};
pub use normalize::{normalize, RawField, RawUtterance};
pub use output::{sanitize, Voice};
