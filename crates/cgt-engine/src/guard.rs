use cgt_config::DEFAULT_ERROR_STREAK_LIMIT;

/// Account standing within one payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AccountStatus {
    Normal,
    /// Terminal: every remaining operation in the payload is refused.
    Blocked,
}

/// Tracks consecutive insufficient-stock rejections and blocks the account
/// once the streak reaches `limit`.
///
/// Any successful operation resets the streak. Outcomes that are neither a
/// success nor an insufficient-stock rejection (internal failures) leave it
/// as it is. Once `Blocked`, nothing moves the guard back to `Normal`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountGuard {
    status: AccountStatus,
    streak: u32,
    limit: u32,
}

impl AccountGuard {
    /// A `limit` of zero is treated as one.
    pub fn new(limit: u32) -> Self {
        Self {
            status: AccountStatus::Normal,
            streak: 0,
            limit: limit.max(1),
        }
    }

    pub fn status(&self) -> AccountStatus {
        self.status
    }

    pub fn is_blocked(&self) -> bool {
        self.status == AccountStatus::Blocked
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn record_success(&mut self) {
        if !self.is_blocked() {
            self.streak = 0;
        }
    }

    pub fn record_insufficient_stock(&mut self) -> AccountStatus {
        if self.is_blocked() {
            return self.status;
        }
        self.streak = self.streak.saturating_add(1);
        if self.streak >= self.limit {
            self.status = AccountStatus::Blocked;
        }
        self.status
    }
}

impl Default for AccountGuard {
    fn default() -> Self {
        Self::new(DEFAULT_ERROR_STREAK_LIMIT)
    }
}
