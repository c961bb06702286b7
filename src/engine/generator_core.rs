// ==========================================
// Panitia Engine - generator core rules
// ==========================================
// Pure selection logic: no I/O, no clock, fully deterministic.
// The candidate slice arrives in the availability index's stable order
// (name, then id) and that order IS the tie-break rule.
// ==========================================

use crate::domain::member::Member;
use std::collections::{HashMap, HashSet};

/// One proposed pick before it becomes a stored assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePick {
    pub role: String,
    pub member_id: String,
    pub commission_id: Option<String>,
}

// ==========================================
// GeneratorCore
// ==========================================
pub struct GeneratorCore;

impl GeneratorCore {
    /// Group candidates by commission; members without affiliation are
    /// excluded from diversity counting.
    pub fn partition_by_commission(members: &[Member]) -> HashMap<String, Vec<&Member>> {
        let mut groups: HashMap<String, Vec<&Member>> = HashMap::new();
        for member in members {
            if let Some(commission_id) = &member.commission_id {
                groups.entry(commission_id.clone()).or_default().push(member);
            }
        }
        groups
    }

    /// Walk the required roles in fixed order and pick members
    ///
    /// Rules:
    /// - a role in `skip_roles` is already occupied (locked row) and is not refilled
    /// - a gatekeeper role draws from its commission's pool only
    /// - every other role draws from the gatekeeper-excluded pool first, so a
    ///   scarce gatekeeper commission is not consumed by an earlier role;
    ///   when that pool runs dry the full candidate list is the fallback
    /// - no member holds two required roles in the same pass
    /// - a role with no eligible member left stays unfilled (counted by the
    ///   caller against the role-fill gate)
    pub fn select_committee(
        candidates: &[Member],
        required_roles: &[String],
        skip_roles: &HashSet<String>,
        gatekeeper_commission_by_role: &HashMap<String, String>,
    ) -> Vec<RolePick> {
        let reserved: HashSet<&str> = gatekeeper_commission_by_role
            .values()
            .map(String::as_str)
            .collect();

        let mut picks = Vec::new();
        let mut claimed: HashSet<&str> = HashSet::new();

        for role in required_roles {
            if skip_roles.contains(role) {
                continue;
            }

            let selected = match gatekeeper_commission_by_role.get(role) {
                Some(commission_id) => candidates.iter().find(|m| {
                    m.commission_id.as_deref() == Some(commission_id.as_str())
                        && !claimed.contains(m.member_id.as_str())
                }),
                None => candidates
                    .iter()
                    .find(|m| {
                        !claimed.contains(m.member_id.as_str())
                            && m.commission_id
                                .as_deref()
                                .map(|c| !reserved.contains(c))
                                .unwrap_or(true)
                    })
                    .or_else(|| {
                        candidates
                            .iter()
                            .find(|m| !claimed.contains(m.member_id.as_str()))
                    }),
            };

            if let Some(member) = selected {
                claimed.insert(member.member_id.as_str());
                picks.push(RolePick {
                    role: role.clone(),
                    member_id: member.member_id.clone(),
                    commission_id: member.commission_id.clone(),
                });
            }
        }

        picks
    }

}
