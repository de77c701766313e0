/// Visibility conditions over story flags.

use std::collections::BTreeMap;

use crate::schema::action::{Action, ShowIf};

fn is_set(flags: &BTreeMap<String, bool>, flag: &str) -> bool {
    flags.get(flag).copied().unwrap_or(false)
}

/// Evaluate an optional `show_if` against the current flags.
///
/// An absent predicate always holds. A flag missing from `flags` counts as
/// unset.
pub fn evaluate(show_if: Option<&ShowIf>, flags: &BTreeMap<String, bool>) -> bool {
    let Some(cond) = show_if else {
        return true;
    };
    cond.all_set.iter().all(|flag| is_set(flags, flag))
        && !cond.none_set.iter().any(|flag| is_set(flags, flag))
}

/// Returns true if the action is offered to a player holding `flags`.
pub fn is_visible(action: &Action, flags: &BTreeMap<String, bool>) -> bool {
    evaluate(action.show_if.as_ref(), flags)
}

/// Labels of the actions visible under `flags`, in authored order.
pub fn visible_actions(actions: &[Action], flags: &BTreeMap<String, bool>) -> Vec<String> {
    actions
        .iter()
        .filter(|action| is_visible(action, flags))
        .map(|action| action.text.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::action::Transition;

    fn flags(set: &[(&str, bool)]) -> BTreeMap<String, bool> {
        set.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn show_if(all: &[&str], none: &[&str]) -> ShowIf {
        ShowIf {
            all_set: all.iter().map(|s| s.to_string()).collect(),
            none_set: none.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn action(text: &str, cond: Option<ShowIf>) -> Action {
        Action {
            text: text.to_string(),
            transition: Transition::local("next"),
            show_if: cond,
        }
    }

    #[test]
    fn absent_condition_always_holds() {
        assert!(evaluate(None, &BTreeMap::new()));
        assert!(evaluate(None, &flags(&[("anything", true)])));
    }

    #[test]
    fn empty_condition_holds() {
        assert!(evaluate(Some(&ShowIf::default()), &BTreeMap::new()));
    }

    #[test]
    fn all_set_requires_every_flag_true() {
        let cond = show_if(&["doorOpened", "lampLit"], &[]);
        assert!(evaluate(
            Some(&cond),
            &flags(&[("doorOpened", true), ("lampLit", true)])
        ));
        assert!(!evaluate(Some(&cond), &flags(&[("doorOpened", true)])));
        assert!(!evaluate(
            Some(&cond),
            &flags(&[("doorOpened", true), ("lampLit", false)])
        ));
    }

    #[test]
    fn none_set_rejects_any_true_flag() {
        let cond = show_if(&[], &["alarmRaised"]);
        assert!(evaluate(Some(&cond), &BTreeMap::new()));
        assert!(evaluate(Some(&cond), &flags(&[("alarmRaised", false)])));
        assert!(!evaluate(Some(&cond), &flags(&[("alarmRaised", true)])));
    }

    #[test]
    fn both_lists_combine() {
        let cond = show_if(&["doorOpened"], &["alarmRaised"]);
        assert!(evaluate(Some(&cond), &flags(&[("doorOpened", true)])));
        assert!(!evaluate(
            Some(&cond),
            &flags(&[("doorOpened", true), ("alarmRaised", true)])
        ));
        assert!(!evaluate(Some(&cond), &BTreeMap::new()));
    }

    #[test]
    fn visible_actions_filter_and_keep_order() {
        let actions = vec![
            action("Look around", None),
            action("Enter the hall", Some(show_if(&["doorOpened"], &[]))),
            action("Knock", Some(show_if(&[], &["doorOpened"]))),
            action("Leave", None),
        ];

        assert_eq!(
            visible_actions(&actions, &BTreeMap::new()),
            vec!["Look around", "Knock", "Leave"]
        );
        assert_eq!(
            visible_actions(&actions, &flags(&[("doorOpened", true)])),
            vec!["Look around", "Enter the hall", "Leave"]
        );
    }
}
