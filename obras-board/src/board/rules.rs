//! Status label rules
//!
//! Moving a card into a list with a status role adjusts its labels:
//! a `Completed` list gives the card the completed label, strips the
//! in-progress and urgent labels and asks for a completion notification;
//! an `InProgress` list only adds the in-progress label.
//!
//! Roles are stored on each list. Titles are only consulted to pick a
//! role when a list is created without one, using a fixed vocabulary
//! matched case- and accent-insensitively by substring.

use super::model::ListRole;
use crate::database::Label;

const COMPLETED_TERMS: &[&str] = &["concluido", "finalizado", "completed", "done"];
const IN_PROGRESS_TERMS: &[&str] = &["fazendo", "em andamento", "in progress", "doing"];
const URGENT_TERMS: &[&str] = &["urgente", "urgent"];

/// Status meaning of a label, derived from its title
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Urgent,
    InProgress,
    Completed,
    Other,
}

/// Labels to add to and remove from a moved card
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelPlan {
    pub add: Vec<Label>,
    pub remove: Vec<Label>,
    pub notify_completion: bool,
}

impl LabelPlan {
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty() && !self.notify_completion
    }
}

/// Lowercase and strip the Portuguese diacritics
fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

fn mentions(text: &str, terms: &[&str]) -> bool {
    let text = normalize(text);
    terms.iter().any(|term| text.contains(term))
}

/// Role a list gets from its title when none is given explicitly
pub fn infer_list_role(title: &str) -> ListRole {
    if mentions(title, COMPLETED_TERMS) {
        ListRole::Completed
    } else if mentions(title, IN_PROGRESS_TERMS) {
        ListRole::InProgress
    } else {
        ListRole::None
    }
}

pub fn classify_label(label: &Label) -> LabelKind {
    if mentions(&label.title, COMPLETED_TERMS) {
        LabelKind::Completed
    } else if mentions(&label.title, IN_PROGRESS_TERMS) {
        LabelKind::InProgress
    } else if mentions(&label.title, URGENT_TERMS) {
        LabelKind::Urgent
    } else {
        LabelKind::Other
    }
}

fn find_kind<'a>(labels: &'a [Label], kind: LabelKind) -> Option<&'a Label> {
    labels.iter().find(|label| classify_label(label) == kind)
}

/// Plan the label changes for a card carrying `card_labels` that lands
/// in a list with `role`. `catalog` is the board-wide label set.
pub fn plan_label_changes(role: ListRole, card_labels: &[Label], catalog: &[Label]) -> LabelPlan {
    let mut plan = LabelPlan::default();

    match role {
        ListRole::None => {}
        ListRole::InProgress => {
            if find_kind(card_labels, LabelKind::InProgress).is_none() {
                match find_kind(catalog, LabelKind::InProgress) {
                    Some(label) => plan.add.push(label.clone()),
                    None => tracing::warn!("No in-progress label in the catalog"),
                }
            }
        }
        ListRole::Completed => {
            if find_kind(card_labels, LabelKind::Completed).is_none() {
                match find_kind(catalog, LabelKind::Completed) {
                    Some(label) => plan.add.push(label.clone()),
                    None => tracing::warn!("No completed label in the catalog"),
                }
            }

            for label in card_labels {
                let kind = classify_label(label);
                let stale = kind == LabelKind::InProgress || kind == LabelKind::Urgent;
                if stale && !plan.remove.iter().any(|l| l.id == label.id) {
                    plan.remove.push(label.clone());
                }
            }

            plan.notify_completion = true;
        }
    }

    plan
}
