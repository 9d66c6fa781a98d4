//! Signed-in user context handed to role-gated views.

use crate::members::{Member, MemberId, MemberRole};

/// Treasury screens a session may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreasurySection {
    Balances,
    Correlations,
    Ledger,
    MemberStatuses,
    OwnStatus,
}

/// Created at login and dropped at logout; never mutated in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    member_id: MemberId,
    role: MemberRole,
}

impl Session {
    pub fn new(member_id: MemberId, role: MemberRole) -> Self {
        Self { member_id, role }
    }

    pub fn login(member: &Member) -> Self {
        Self::new(member.id.clone(), member.role)
    }

    pub fn member_id(&self) -> &MemberId {
        &self.member_id
    }

    pub fn role(&self) -> MemberRole {
        self.role
    }

    pub fn can_manage_treasury(&self) -> bool {
        matches!(self.role, MemberRole::Admin | MemberRole::Treasurer)
    }

    pub fn can_view_member(&self, member_id: &MemberId) -> bool {
        self.can_manage_treasury() || &self.member_id == member_id
    }

    pub fn treasury_sections(&self) -> Vec<TreasurySection> {
        if self.can_manage_treasury() {
            vec![
                TreasurySection::Balances,
                TreasurySection::Correlations,
                TreasurySection::Ledger,
                TreasurySection::MemberStatuses,
            ]
        } else {
            vec![TreasurySection::OwnStatus]
        }
    }
}
