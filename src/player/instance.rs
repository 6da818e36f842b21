use crate::InstanceId;
use crate::catalog::ItemTemplate;
use crate::catalog::Stats;
use crate::catalog::UnitTemplate;

/// One owned copy (or merged stack of copies) of a unit. Stars run 1-3;
/// a star-s instance embodies `3^(s-1)` pool copies.
#[derive(Debug, Clone)]
pub struct UnitInstance {
    pub id: InstanceId,
    pub template: &'static UnitTemplate,
    pub star: u8,
    pub health: f32,
    pub mana: f32,
    pub items: Vec<&'static ItemTemplate>,
}

impl UnitInstance {
    pub fn new(id: InstanceId, template: &'static UnitTemplate) -> Self {
        Self {
            id,
            template,
            star: 1,
            health: template.base.health,
            mana: 0.0,
            items: Vec::new(),
        }
    }
    /// Star-scaled template stats, before traits, items, and crests.
    pub fn base_stats(&self) -> Stats {
        self.template.stats_at(self.star)
    }
    /// Raises the star level and refills health to the new base.
    pub fn star_up(&mut self) {
        self.star = (self.star + 1).min(3);
        self.health = self.base_stats().health;
    }
    pub fn key(&self) -> (&'static str, u8) {
        (self.template.id, self.star)
    }
}
