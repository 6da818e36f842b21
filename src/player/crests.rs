use super::state::OwnedCrest;
use super::state::PlayerState;
use crate::MINOR_CRESTS;
use crate::catalog::CrestTemplate;
use crate::catalog::MAX_CREST_RANK;
use crate::error::ActionError;

/// What happened when a minor crest was acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrestGain {
    Added,
    Ranked(u8),
    Maxed,
    NeedsReplacement,
}

impl PlayerState {
    /// Minor crest acquisition: repeat pickups rank an owned crest up to
    /// rank 3; a new crest joins while fewer than three are held;
    /// otherwise the crest parks as a pending replacement and the player
    /// must evict one.
    pub fn acquire_minor_crest(&mut self, crest: &'static CrestTemplate) -> CrestGain {
        if let Some(owned) = self.minor_crests.iter_mut().find(|o| o.crest.id == crest.id) {
            if owned.rank < MAX_CREST_RANK {
                owned.rank += 1;
                return CrestGain::Ranked(owned.rank);
            }
            return CrestGain::Maxed;
        }
        if self.minor_crests.len() < MINOR_CRESTS {
            self.minor_crests.push(OwnedCrest { crest, rank: 1 });
            return CrestGain::Added;
        }
        self.pending.crest_replacement = Some(crest);
        CrestGain::NeedsReplacement
    }

    /// Resolves a pending crest choice by index.
    pub fn select_crest_choice(&mut self, choice: usize) -> Result<CrestGain, ActionError> {
        let options = self.pending.crest_choices.as_ref().ok_or(ActionError::NoPendingChoice)?;
        let crest = *options.get(choice).ok_or(ActionError::NoSuchChoice)?;
        self.pending.crest_choices = None;
        Ok(self.acquire_minor_crest(crest))
    }

    /// Resolves a pending crest choice by crest id.
    pub fn select_minor_crest(&mut self, id: &str) -> Result<CrestGain, ActionError> {
        let options = self.pending.crest_choices.as_ref().ok_or(ActionError::NoPendingChoice)?;
        let choice = options.iter().position(|c| c.id == id).ok_or(ActionError::NoSuchChoice)?;
        self.select_crest_choice(choice)
    }

    /// Evicts the crest at `index` in favor of the parked replacement.
    pub fn replace_crest(&mut self, index: usize) -> Result<(), ActionError> {
        let incoming = self.pending.crest_replacement.ok_or(ActionError::NoPendingChoice)?;
        if index >= self.minor_crests.len() {
            return Err(ActionError::NoSuchChoice);
        }
        self.minor_crests[index] = OwnedCrest { crest: incoming, rank: 1 };
        self.pending.crest_replacement = None;
        Ok(())
    }

    /// Resolves the major-crest round selection by crest id.
    pub fn select_major_crest(&mut self, id: &str) -> Result<(), ActionError> {
        let options = self.pending.major_choices.as_ref().ok_or(ActionError::NoPendingChoice)?;
        let crest = *options.iter().find(|c| c.id == id).ok_or(ActionError::NoSuchChoice)?;
        self.major_crest = Some(crest);
        self.pending.major_choices = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn fixture() -> PlayerState {
        PlayerState::new(1, "tester".into(), 0)
    }

    fn crest(id: &str) -> &'static CrestTemplate {
        Catalog::get().crest(id).expect("crest exists")
    }

    #[test]
    fn repeat_pickups_rank_up_then_cap() {
        let mut player = fixture();
        let iron = crest("crest_iron");
        assert_eq!(player.acquire_minor_crest(iron), CrestGain::Added);
        assert_eq!(player.acquire_minor_crest(iron), CrestGain::Ranked(2));
        assert_eq!(player.acquire_minor_crest(iron), CrestGain::Ranked(3));
        assert_eq!(player.acquire_minor_crest(iron), CrestGain::Maxed);
        assert_eq!(player.minor_crests.len(), 1);
        assert_eq!(player.minor_crests[0].rank, 3);
    }

    #[test]
    fn fourth_distinct_crest_demands_a_replacement() {
        let mut player = fixture();
        for id in ["crest_iron", "crest_storms", "crest_vigor"] {
            assert_eq!(player.acquire_minor_crest(crest(id)), CrestGain::Added);
        }
        let focus = crest("crest_focus");
        assert_eq!(player.acquire_minor_crest(focus), CrestGain::NeedsReplacement);
        assert_eq!(player.minor_crests.len(), 3);
        assert_eq!(player.pending.crest_replacement.map(|c| c.id), Some("crest_focus"));
        player.replace_crest(1).expect("replace");
        assert_eq!(player.minor_crests[1].crest.id, "crest_focus");
        assert_eq!(player.minor_crests[1].rank, 1);
        assert!(player.pending.crest_replacement.is_none());
    }

    #[test]
    fn major_selection_comes_from_the_offered_options() {
        let mut player = fixture();
        player.pending.major_choices = Some(vec![crest("banner_war"), crest("banner_tempest")]);
        let err = player.select_major_crest("banner_aegis").expect_err("not offered");
        assert_eq!(err, ActionError::NoSuchChoice);
        player.select_major_crest("banner_war").expect("offered");
        assert_eq!(player.major_crest.map(|c| c.id), Some("banner_war"));
        assert!(player.pending.major_choices.is_none());
    }
}
