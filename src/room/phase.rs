use serde::Serialize;

/// Room lifecycle phase. Every transition bumps the room's generation
/// counter, which fences out stale timer callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Waiting,
    Planning,
    Combat,
    Results,
    GameOver,
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn wire_names() {
        assert_eq!(serde_json::to_string(&Phase::Waiting).expect("json"), "\"waiting\"");
        assert_eq!(serde_json::to_string(&Phase::GameOver).expect("json"), "\"gameOver\"");
    }
}
