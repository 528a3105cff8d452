use std::fmt;

use serde::Serialize;

/// Non-fatal anomaly recorded while synthesizing a scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SynthesisWarning {
    /// Several receiving meshes qualify; the first one was used.
    AmbiguousPartnerMesh {
        /// Data name of the quantity.
        data: String,
        /// Receiving participant.
        participant: String,
        /// Qualifying meshes in first-seen order.
        candidates: Vec<String>,
        /// Mesh used for the exchange.
        chosen: String,
    },
    /// No receiving mesh is known; a placeholder was used.
    UnresolvedPartnerMesh {
        /// Data name of the quantity.
        data: String,
        /// Receiving participant.
        participant: String,
    },
    /// The quantity has no receiver besides its source and was skipped.
    NonPairwiseQuantity {
        /// Data name of the quantity.
        data: String,
        /// Source participant.
        source: String,
        /// Participants the quantity touches.
        participants: Vec<String>,
    },
    /// The quantity is sent to several receivers; one exchange was emitted per receiver.
    FanOutQuantity {
        /// Data name of the quantity.
        data: String,
        /// Source participant.
        source: String,
        /// Receiving participants in first-seen order.
        receivers: Vec<String>,
    },
    /// Fewer than two participants are declared; a placeholder fills the role.
    MissingParticipant {
        /// Number of declared participants.
        declared: usize,
    },
}

impl fmt::Display for SynthesisWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthesisWarning::AmbiguousPartnerMesh {
                data,
                participant,
                candidates,
                chosen,
            } => write!(
                f,
                "partner mesh for `{data}` on `{participant}` is ambiguous ({}); using `{chosen}`",
                candidates.join(", ")
            ),
            SynthesisWarning::UnresolvedPartnerMesh { data, participant } => write!(
                f,
                "no partner mesh for `{data}` on `{participant}`; using a placeholder"
            ),
            SynthesisWarning::NonPairwiseQuantity {
                data,
                source,
                participants,
            } => write!(
                f,
                "quantity `{data}` from `{source}` touches {} participant(s) ({}); skipped",
                participants.len(),
                participants.join(", ")
            ),
            SynthesisWarning::FanOutQuantity {
                data,
                source,
                receivers,
            } => write!(
                f,
                "quantity `{data}` from `{source}` is sent to {} participants ({}); one exchange per receiver",
                receivers.len(),
                receivers.join(", ")
            ),
            SynthesisWarning::MissingParticipant { declared } => write!(
                f,
                "{declared} participant(s) declared, a coupling needs two; using a placeholder"
            ),
        }
    }
}
