use std::collections::HashMap;

use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::Activity;

/// Validation failures surfaced by registry operations.
///
/// The `Display` strings are the exact messages the API returns in the
/// `detail` field of error responses.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Activity not found")]
    ActivityNotFound,
    #[error("Student is already signed up")]
    AlreadySignedUp,
    #[error("Activity is full")]
    ActivityFull,
    #[error("Participant not found")]
    ParticipantNotFound,
}

/// In-memory catalog of activities, keyed by activity name.
///
/// One instance is built at startup and shared across request handlers. No
/// persistence: the catalog resets on restart. The write lock is held for
/// each whole check-then-mutate sequence, so the duplicate and capacity
/// checks cannot race against a concurrent signup.
#[derive(Debug)]
pub struct ActivityRegistry {
    activities: RwLock<HashMap<String, Activity>>,
}

impl ActivityRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            activities: RwLock::new(HashMap::new()),
        }
    }

    /// Create a registry seeded with the Mergington sample activities.
    pub fn with_sample_activities() -> Self {
        let mut activities = HashMap::new();
        activities.insert(
            "Chess Club".to_string(),
            sample(
                "Learn strategies and compete in chess tournaments",
                "Fridays, 3:30 PM - 5:00 PM",
                12,
                &["michael@mergington.edu", "daniel@mergington.edu"],
            ),
        );
        activities.insert(
            "Programming Class".to_string(),
            sample(
                "Learn programming fundamentals and build software projects",
                "Tuesdays and Thursdays, 3:30 PM - 4:30 PM",
                20,
                &["emma@mergington.edu", "sophia@mergington.edu"],
            ),
        );
        activities.insert(
            "Gym Class".to_string(),
            sample(
                "Physical education and sports activities",
                "Mondays, Wednesdays, Fridays, 2:00 PM - 3:00 PM",
                30,
                &["john@mergington.edu", "olivia@mergington.edu"],
            ),
        );
        activities.insert(
            "Soccer Club".to_string(),
            sample(
                "Outdoor soccer practice and friendly matches",
                "Wednesdays and Saturdays, 4:00 PM - 6:00 PM",
                22,
                &["liam@mergington.edu"],
            ),
        );
        activities.insert(
            "Swimming Team".to_string(),
            sample(
                "Lap training, technique work, and meets",
                "Tuesdays and Thursdays, 5:00 PM - 6:30 PM",
                18,
                &["mia@mergington.edu"],
            ),
        );
        activities.insert(
            "Art Club".to_string(),
            sample(
                "Drawing, painting and weekly critiques",
                "Fridays, 3:30 PM - 5:00 PM",
                16,
                &["sophia@mergington.edu"],
            ),
        );
        activities.insert(
            "Theater Workshop".to_string(),
            sample(
                "Acting exercises, scene study, and small productions",
                "Mondays and Thursdays, 4:00 PM - 6:00 PM",
                20,
                &["noah@mergington.edu"],
            ),
        );
        activities.insert(
            "Math Olympiad".to_string(),
            sample(
                "Problem solving club preparing for math competitions",
                "Wednesdays, 3:30 PM - 5:00 PM",
                15,
                &["emma@mergington.edu"],
            ),
        );
        activities.insert(
            "Science Bowl".to_string(),
            sample(
                "Team-based science trivia and quick-response practice",
                "Tuesdays, 3:30 PM - 4:30 PM",
                12,
                &["alex@mergington.edu"],
            ),
        );

        Self {
            activities: RwLock::new(activities),
        }
    }

    /// Insert or replace an activity.
    pub async fn insert(&self, name: impl Into<String>, activity: Activity) {
        let mut activities = self.activities.write().await;
        activities.insert(name.into(), activity);
    }

    /// Look up a single activity by name.
    pub async fn get(&self, name: &str) -> Option<Activity> {
        let activities = self.activities.read().await;
        activities.get(name).cloned()
    }

    /// Clone of the full catalog, for the read endpoint.
    pub async fn snapshot(&self) -> HashMap<String, Activity> {
        let activities = self.activities.read().await;
        activities.clone()
    }

    /// Sign `email` up for the activity called `name`.
    ///
    /// Checks run in order, first failure wins: the activity must exist, the
    /// normalized email must not match an existing participant, and there
    /// must be a spot left. On success the participant list stores `email`
    /// exactly as supplied; normalization applies to comparisons only.
    pub async fn signup(&self, name: &str, email: &str) -> Result<(), RegistryError> {
        let mut activities = self.activities.write().await;
        let activity = activities
            .get_mut(name)
            .ok_or(RegistryError::ActivityNotFound)?;

        let normalized = normalize_email(email);
        if activity
            .participants
            .iter()
            .any(|p| normalize_email(p) == normalized)
        {
            return Err(RegistryError::AlreadySignedUp);
        }

        if activity.participants.len() >= activity.max_participants {
            return Err(RegistryError::ActivityFull);
        }

        activity.participants.push(email.to_string());
        Ok(())
    }

    /// Remove the participant whose normalized email matches `email` from the
    /// activity called `name`, keeping the relative order of the rest.
    pub async fn unregister(&self, name: &str, email: &str) -> Result<(), RegistryError> {
        let mut activities = self.activities.write().await;
        let activity = activities
            .get_mut(name)
            .ok_or(RegistryError::ActivityNotFound)?;

        let normalized = normalize_email(email);
        let position = activity
            .participants
            .iter()
            .position(|p| normalize_email(p) == normalized)
            .ok_or(RegistryError::ParticipantNotFound)?;

        activity.participants.remove(position);
        Ok(())
    }
}

impl Default for ActivityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Trim surrounding whitespace and lowercase. Used for equality checks only;
/// stored participant entries keep their original form.
fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn sample(
    description: &str,
    schedule: &str,
    max_participants: usize,
    participants: &[&str],
) -> Activity {
    Activity {
        description: description.to_string(),
        schedule: schedule.to_string(),
        max_participants,
        participants: participants.iter().map(|p| p.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(max_participants: usize, participants: &[&str]) -> Activity {
        sample("Temp activity", "Now", max_participants, participants)
    }

    #[tokio::test]
    async fn sample_catalog_contains_all_nine_activities() {
        let registry = ActivityRegistry::with_sample_activities();
        let catalog = registry.snapshot().await;

        assert_eq!(catalog.len(), 9);
        for name in [
            "Chess Club",
            "Programming Class",
            "Gym Class",
            "Soccer Club",
            "Swimming Team",
            "Art Club",
            "Theater Workshop",
            "Math Olympiad",
            "Science Bowl",
        ] {
            assert!(catalog.contains_key(name), "missing {name}");
        }

        let chess = &catalog["Chess Club"];
        assert_eq!(chess.max_participants, 12);
        assert_eq!(
            chess.participants,
            vec!["michael@mergington.edu", "daniel@mergington.edu"]
        );
    }

    #[tokio::test]
    async fn signup_appends_email_exactly_as_supplied() {
        let registry = ActivityRegistry::new();
        registry.insert("Chess Club", activity(5, &[])).await;

        registry.signup("Chess Club", " Alice@Example.COM ").await.unwrap();

        let chess = registry.get("Chess Club").await.unwrap();
        assert_eq!(chess.participants, vec![" Alice@Example.COM "]);
    }

    #[tokio::test]
    async fn signup_increments_count_by_exactly_one() {
        let registry = ActivityRegistry::new();
        registry.insert("Art Club", activity(5, &["a@x.com"])).await;

        registry.signup("Art Club", "b@x.com").await.unwrap();

        let art = registry.get("Art Club").await.unwrap();
        assert_eq!(art.participants, vec!["a@x.com", "b@x.com"]);
    }

    #[tokio::test]
    async fn duplicate_detection_ignores_case_and_whitespace() {
        let registry = ActivityRegistry::new();
        registry.insert("Chess Club", activity(5, &[])).await;
        registry.signup("Chess Club", "user1@example.com").await.unwrap();

        for variant in ["user1@example.com", " user1@example.com ", "USER1@Example.Com"] {
            assert_eq!(
                registry.signup("Chess Club", variant).await,
                Err(RegistryError::AlreadySignedUp),
                "variant {variant:?} should be rejected"
            );
        }

        // Rejections never mutate.
        let chess = registry.get("Chess Club").await.unwrap();
        assert_eq!(chess.participants, vec!["user1@example.com"]);
    }

    #[tokio::test]
    async fn capacity_is_enforced_at_the_boundary() {
        let registry = ActivityRegistry::new();
        registry.insert("Chess Club", activity(2, &[])).await;

        registry.signup("Chess Club", "a@x.com").await.unwrap();
        registry.signup("Chess Club", "b@x.com").await.unwrap();
        assert_eq!(
            registry.signup("Chess Club", "c@x.com").await,
            Err(RegistryError::ActivityFull)
        );

        let chess = registry.get("Chess Club").await.unwrap();
        assert_eq!(chess.participants.len(), 2);
    }

    #[tokio::test]
    async fn duplicate_wins_over_capacity_when_activity_is_full() {
        let registry = ActivityRegistry::new();
        registry
            .insert("Chess Club", activity(1, &["a@x.com"]))
            .await;

        assert_eq!(
            registry.signup("Chess Club", " A@X.COM ").await,
            Err(RegistryError::AlreadySignedUp)
        );
    }

    #[tokio::test]
    async fn normalized_variants_never_overfill_an_activity() {
        let registry = ActivityRegistry::new();
        registry.insert("Chess Club", activity(2, &["A@x.com"])).await;

        // The variant counts as the same student, so one spot stays open.
        assert_eq!(
            registry.signup("Chess Club", "a@x.com").await,
            Err(RegistryError::AlreadySignedUp)
        );
        registry.signup("Chess Club", "b@x.com").await.unwrap();
        assert_eq!(
            registry.signup("Chess Club", "c@x.com").await,
            Err(RegistryError::ActivityFull)
        );
    }

    #[tokio::test]
    async fn signup_unknown_activity_is_not_found() {
        let registry = ActivityRegistry::new();
        assert_eq!(
            registry.signup("NoSuchActivity", "x@y.com").await,
            Err(RegistryError::ActivityNotFound)
        );
    }

    #[tokio::test]
    async fn unregister_unknown_activity_is_not_found() {
        let registry = ActivityRegistry::new();
        assert_eq!(
            registry.unregister("NoSuchActivity", "x@y.com").await,
            Err(RegistryError::ActivityNotFound)
        );
    }

    #[tokio::test]
    async fn unregister_removes_first_match_and_keeps_order() {
        let registry = ActivityRegistry::new();
        registry
            .insert("Gym Class", activity(10, &["a@x.com", "b@x.com", "c@x.com"]))
            .await;

        registry.unregister("Gym Class", " B@X.com ").await.unwrap();

        let gym = registry.get("Gym Class").await.unwrap();
        assert_eq!(gym.participants, vec!["a@x.com", "c@x.com"]);
    }

    #[tokio::test]
    async fn unregister_missing_participant_is_not_found() {
        let registry = ActivityRegistry::new();
        registry.insert("Gym Class", activity(10, &["a@x.com"])).await;

        assert_eq!(
            registry.unregister("Gym Class", "notfound@example.com").await,
            Err(RegistryError::ParticipantNotFound)
        );

        let gym = registry.get("Gym Class").await.unwrap();
        assert_eq!(gym.participants, vec!["a@x.com"]);
    }

    #[tokio::test]
    async fn signup_then_unregister_restores_the_prior_list() {
        let registry = ActivityRegistry::new();
        registry
            .insert("Swimming Team", activity(10, &["Mia@mergington.edu", "zoe@mergington.edu"]))
            .await;
        let before = registry.get("Swimming Team").await.unwrap();

        registry.signup("Swimming Team", "Noah@Mergington.edu").await.unwrap();
        registry
            .unregister("Swimming Team", " noah@mergington.edu ")
            .await
            .unwrap();

        let after = registry.get("Swimming Team").await.unwrap();
        assert_eq!(after, before);
    }
}
