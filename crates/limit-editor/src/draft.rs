use std::collections::BTreeMap;

use quota_shared::{
    const_config::limits::PRESET_LIMITS,
    id::UserId,
    uac::{DailyLimit, UserRecord},
};

/// One of the fixed preset limits offered to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Preset(DailyLimit);

impl Preset {
    /// All presets in display order
    pub fn all() -> impl Iterator<Item = Preset> {
        PRESET_LIMITS.into_iter().map(Preset)
    }

    pub fn limit(self) -> DailyLimit {
        self.0
    }
}

impl TryFrom<DailyLimit> for Preset {
    type Error = DailyLimit;

    /// Succeeds only for values that are in the preset list
    fn try_from(value: DailyLimit) -> Result<Self, Self::Error> {
        if PRESET_LIMITS.contains(&value) {
            Ok(Self(value))
        } else {
            Err(value)
        }
    }
}

/// Pending (not yet persisted) limits for one editing session
///
/// Keys are fixed when seeded, mutations for any other user are ignored and
/// reported as `None`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DraftLimits(BTreeMap<UserId, DailyLimit>);

impl DraftLimits {
    /// Starts each user off at their currently persisted limit
    pub fn seed<'a, I>(users: I) -> Self
    where
        I: IntoIterator<Item = &'a UserRecord>,
    {
        Self(
            users
                .into_iter()
                .map(|user| (user.id.clone(), user.daily_limit))
                .collect(),
        )
    }

    pub fn get(&self, user_id: &UserId) -> Option<DailyLimit> {
        self.0.get(user_id).copied()
    }

    pub fn apply_delta(&mut self, user_id: &UserId, delta: i64) -> Option<DailyLimit> {
        let value = self.0.get_mut(user_id)?;
        *value = value.saturating_add_signed(delta);
        Some(*value)
    }

    pub fn set(&mut self, user_id: &UserId, limit: DailyLimit) -> Option<DailyLimit> {
        let value = self.0.get_mut(user_id)?;
        *value = limit;
        Some(limit)
    }

    pub fn apply_preset(&mut self, user_id: &UserId, preset: Preset) -> Option<DailyLimit> {
        self.set(user_id, preset.limit())
    }

    /// See [`DailyLimit::from_input`] for how the text is interpreted
    pub fn set_from_input(&mut self, user_id: &UserId, input: &str) -> Option<DailyLimit> {
        self.set(user_id, DailyLimit::from_input(input))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&UserId, DailyLimit)> {
        self.0.iter().map(|(id, limit)| (id, *limit))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use quota_shared::uac::Role;
    use rstest::rstest;

    use super::*;

    fn user(id: &str, limit: u32) -> UserRecord {
        UserRecord {
            id: id.try_into().unwrap(),
            display_name: id.try_into().unwrap(),
            role: Role::User,
            daily_limit: DailyLimit::new(limit),
            is_active: true,
        }
    }

    fn id(value: &str) -> UserId {
        value.try_into().unwrap()
    }

    #[test]
    fn seed_copies_persisted_limits() {
        // Arrange
        let users = [user("u1", 100), user("u2", 0)];

        // Act
        let drafts = DraftLimits::seed(&users);

        // Assert
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts.get(&id("u1")), Some(DailyLimit::new(100)));
        assert_eq!(drafts.get(&id("u2")), Some(DailyLimit::ZERO));
    }

    #[rstest]
    #[case::up_and_down(100, &[50, -10, 10, -50], 100)]
    #[case::floor_holds(20, &[-10, -10, -10, -50], 0)]
    #[case::recovers_from_floor(0, &[-50, -50, 10], 10)]
    #[case::large_negative(1000, &[i64::MIN, 50], 50)]
    fn delta_sequences_never_go_negative(
        #[case] start: u32,
        #[case] deltas: &[i64],
        #[case] expected: u32,
    ) {
        // Arrange
        let users = [user("u1", start)];
        let mut drafts = DraftLimits::seed(&users);

        // Act
        for delta in deltas {
            drafts.apply_delta(&id("u1"), *delta);
        }

        // Assert
        assert_eq!(drafts.get(&id("u1")), Some(DailyLimit::new(expected)));
    }

    #[test]
    fn preset_replaces_value_outright() {
        // Arrange
        let users = [user("u1", 7)];
        let mut drafts = DraftLimits::seed(&users);

        for preset in Preset::all() {
            // Act
            drafts.apply_delta(&id("u1"), 13);
            let actual = drafts.apply_preset(&id("u1"), preset);

            // Assert
            assert_eq!(actual, Some(preset.limit()));
            assert_eq!(drafts.get(&id("u1")), Some(preset.limit()));
        }
    }

    #[test]
    fn input_is_absolute_not_relative() {
        // Arrange
        let users = [user("u1", 300)];
        let mut drafts = DraftLimits::seed(&users);

        // Act
        let actual = drafts.set_from_input(&id("u1"), "25");

        // Assert
        assert_eq!(actual, Some(DailyLimit::new(25)));
    }

    #[test]
    fn unknown_user_is_not_added() {
        // Arrange
        let users = [user("u1", 300)];
        let mut drafts = DraftLimits::seed(&users);

        // Act
        let delta = drafts.apply_delta(&id("ghost"), 10);
        let set = drafts.set_from_input(&id("ghost"), "10");

        // Assert
        assert_eq!(delta, None);
        assert_eq!(set, None);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts.get(&id("ghost")), None);
    }

    #[test]
    fn presets_are_in_display_order() {
        let actual: Vec<u32> = Preset::all().map(|p| p.limit().get()).collect();
        assert_eq!(actual, [100, 200, 300, 500, 1000]);
    }

    #[rstest]
    #[case::preset(500, true)]
    #[case::not_preset(450, false)]
    fn preset_from_limit(#[case] value: u32, #[case] is_preset: bool) {
        assert_eq!(
            Preset::try_from(DailyLimit::new(value)).is_ok(),
            is_preset
        );
    }
}
