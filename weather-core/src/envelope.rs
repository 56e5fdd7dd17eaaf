/// Lifecycle of one asynchronous fetch.
///
/// A slot starts as [`ResultEnvelope::Idle`]. Every request moves it to
/// [`ResultEnvelope::Loading`] and then to exactly one of `Success` or `Error`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResultEnvelope<T> {
    #[default]
    Idle,
    Loading,
    Success(T),
    Error(String),
}

impl<T> ResultEnvelope<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, ResultEnvelope::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ResultEnvelope::Loading)
    }

    /// `true` for `Success` and `Error`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ResultEnvelope::Success(_) | ResultEnvelope::Error(_))
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            ResultEnvelope::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ResultEnvelope::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ResultEnvelope<U> {
        match self {
            ResultEnvelope::Idle => ResultEnvelope::Idle,
            ResultEnvelope::Loading => ResultEnvelope::Loading,
            ResultEnvelope::Success(data) => ResultEnvelope::Success(f(data)),
            ResultEnvelope::Error(message) => ResultEnvelope::Error(message),
        }
    }
}
