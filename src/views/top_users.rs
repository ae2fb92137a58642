use crate::aggregate::User;
use crate::views::{Api, Phase};

/// The "top contributors" view: one fetch on load, ranked list with badges for the top 3.
pub struct TopUsersView {
    phase: Phase<Vec<User>>,
}

impl TopUsersView {
    pub fn new() -> Self {
        Self {
            phase: Phase::Loading,
        }
    }

    pub async fn load<A: Api>(&mut self, api: &A) {
        self.phase = Phase::from_result(api.top_users().await);
    }

    pub fn render(&self) -> String {
        let users = match &self.phase {
            Phase::Loading => return "Loading top contributors...\n".to_owned(),
            Phase::Failed => return "Failed to fetch users. Please try again later.\n".to_owned(),
            Phase::Ready(users) => users,
        };
        let mut out = String::from("Top Contributors\n");
        for (rank, user) in users.iter().enumerate() {
            let badge = if rank < 3 {
                format!("#{}", rank + 1)
            } else {
                "  ".to_owned()
            };
            out.push_str(&format!(
                " {:<2} {} ({} posts)\n",
                badge, user.name, user.post_count
            ));
        }
        out
    }
}

impl Default for TopUsersView {
    fn default() -> Self {
        Self::new()
    }
}
