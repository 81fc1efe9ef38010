use crate::generation::{GenerationJob, GenerationResult};

/// Status of the image-generation request, as shown by the UI
#[derive(Debug, Default)]
pub enum GenerationState {
    #[default]
    Idle,
    Pending {
        job: GenerationJob,
        prompt: String,
    },
}

impl GenerationState {
    pub fn start(&mut self, job: GenerationJob, prompt: &str) {
        if self.is_pending() {
            log::warn!("Replacing a generation request that is still pending");
        }
        *self = Self::Pending {
            job,
            prompt: prompt.to_owned(),
        };
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    pub fn pending_prompt(&self) -> Option<&str> {
        match self {
            Self::Pending { prompt, .. } => Some(prompt),
            Self::Idle => None,
        }
    }

    /// Check the outstanding job; returns to `Idle` once it has an answer
    pub fn poll(&mut self) -> Option<GenerationResult> {
        let Self::Pending { job, .. } = self else {
            return None;
        };
        let result = job.poll()?;
        *self = Self::Idle;
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerationError;
    use crate::generation::GeneratedImage;

    #[test]
    fn test_idle_polls_nothing() {
        let mut state = GenerationState::default();
        assert!(!state.is_pending());
        assert!(state.poll().is_none());
    }

    #[test]
    fn test_pending_resolves_to_idle() {
        let image = GeneratedImage {
            bytes: vec![1],
            mime_type: "image/png".to_owned(),
        };
        let mut state = GenerationState::default();
        state.start(GenerationJob::ready(Ok(image.clone())), "a dog");
        assert_eq!(state.pending_prompt(), Some("a dog"));

        assert_eq!(state.poll().unwrap().unwrap(), image);
        assert!(!state.is_pending());
    }

    #[test]
    fn test_failure_resolves_to_idle() {
        let mut state = GenerationState::default();
        state.start(GenerationJob::ready(Err(GenerationError::NoImage)), "x");
        assert!(matches!(state.poll(), Some(Err(GenerationError::NoImage))));
        assert!(state.poll().is_none());
    }
}
