//! User and inbox operator implementation.

use tracing::{info, warn};

use crate::domain::preference::UserNotificationPreference;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::inbound::operator::user::{
    InboxRequest, InboxView, UnknownTier, UserImportReport, UserOperator,
};

use super::{entry::Operator, shared};

impl UserOperator for Operator {
    fn import_users(
        &self,
        config_toml: &str,
        users: Vec<UserNotificationPreference>,
    ) -> Result<UserImportReport> {
        let (config, stores) = shared::open_stores(config_toml)?;
        let tiers = config.tier_table();
        let mut report = UserImportReport::default();

        for prefs in &users {
            if tiers.resolve(&prefs.tier).name != prefs.tier {
                warn!(user = %prefs.user_id, tier = %prefs.tier, "Unknown tier, free limits apply");
                report.unknown_tiers.push(UnknownTier {
                    user_id: prefs.user_id.clone(),
                    tier: prefs.tier.clone(),
                });
            }
            stores.users.upsert(prefs)?;
            report.imported += 1;
        }

        info!(imported = report.imported, "Users imported");
        Ok(report)
    }

    fn list_users(&self, config_toml: &str) -> Result<Vec<UserNotificationPreference>> {
        let (_, stores) = shared::open_stores(config_toml)?;
        stores.users.active_users()
    }

    fn inbox(&self, config_toml: &str, request: &InboxRequest) -> Result<InboxView> {
        let app = self.app(Config::parse_toml(config_toml)?)?;
        let user_id = &request.user_id;

        let marked = request
            .mark_read
            .map(|id| app.dispatcher.mark_read(id, user_id))
            .transpose()?;

        let notifications = if request.unread_only {
            app.dispatcher.unread(user_id, request.limit)?
        } else {
            app.stores
                .notifications
                .list_for_user(user_id, false, request.limit)?
        };

        Ok(InboxView {
            user_id: user_id.clone(),
            marked,
            notifications,
        })
    }
}
