#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::rc::Rc;

    use proptest::prelude::*;

    use crate::locals::locals_depth;
    use crate::prelude::*;

    fn sequence() -> Vec<Action> {
        vec![
            Action::SetCount { count: 5 },
            Action::SetText {
                text: "world".into(),
            },
            Action::ToggleGood,
            Action::SetColor {
                color: Color::Yellow,
            },
        ]
    }

    fn final_state() -> SampleState {
        SampleState {
            count: 5,
            text: "world".into(),
            color: Color::Yellow,
            is_good: false,
        }
    }

    #[test]
    fn test_default_state() {
        let provider = SampleProvider::new();
        let state = provider.provide(use_sample_state);
        assert_eq!(
            state,
            SampleState {
                count: 0,
                text: "hello".into(),
                color: Color::Red,
                is_good: true,
            }
        );
    }

    #[test]
    fn test_dispatch_sequence() {
        let provider = SampleProvider::new();
        provider.provide(|| {
            let dispatch = use_sample_dispatch();
            for action in sequence() {
                dispatch.dispatch(action);
            }
            assert_eq!(use_sample_state(), final_state());
        });
        assert_eq!(provider.state(), final_state());
    }

    #[test]
    fn test_wire_sequence() {
        let provider = SampleProvider::new();
        let dispatch = provider.dispatch();
        for json in [
            r#"{"type":"SET_COUNT","count":5}"#,
            r#"{"type":"SET_TEXT","text":"world"}"#,
            r#"{"type":"TOGGLE_GOOD"}"#,
            r#"{"type":"SET_COLOR","color":"yellow"}"#,
        ] {
            dispatch.dispatch_json(json).unwrap();
        }
        assert_eq!(provider.state(), final_state());
    }

    #[test]
    fn test_missing_provider() {
        match try_use_sample_state() {
            Err(ContextError::MissingProvider { context }) => assert_eq!(context, "SampleProvider"),
            other => panic!("expected MissingProvider, got {other:?}"),
        }
        let err = try_use_sample_dispatch().err().unwrap();
        assert_eq!(err.to_string(), "Cannot find SampleDispatchContext");
        assert!(observe_sample_state(|_| {}).is_err());
    }

    #[test]
    #[should_panic(expected = "Cannot find SampleProvider")]
    fn test_use_state_outside_provider_panics() {
        let _ = use_sample_state();
    }

    #[test]
    #[should_panic(expected = "Cannot find SampleDispatchContext")]
    fn test_use_dispatch_outside_provider_panics() {
        let _ = use_sample_dispatch();
    }

    #[test]
    fn test_accessors_fail_after_provide_returns() {
        let provider = SampleProvider::new();
        provider.provide(|| assert!(try_use_sample_state().is_ok()));
        assert!(try_use_sample_state().is_err());
        assert_eq!(locals_depth(), 0);
    }

    #[test]
    fn test_unhandled_action_leaves_state() {
        let provider = SampleProvider::new();
        let dispatch = provider.dispatch();
        dispatch.dispatch(Action::SetCount { count: 7 });

        match dispatch.dispatch_json(r#"{"type":"RESET"}"#) {
            Err(ContextError::UnhandledAction { tag }) => assert_eq!(tag, "RESET"),
            other => panic!("expected UnhandledAction, got {other:?}"),
        }
        match Action::from_json(r#"{"type":5}"#) {
            Err(ContextError::UnhandledAction { tag }) => assert_eq!(tag, "5"),
            other => panic!("expected UnhandledAction, got {other:?}"),
        }

        assert_eq!(
            provider.state(),
            SampleState {
                count: 7,
                ..SampleState::default()
            }
        );
    }

    #[test]
    fn test_malformed_actions() {
        for json in [
            r#"{"count":5}"#,
            r#"{"type":"SET_COUNT","count":"five"}"#,
            r#"{"type":"SET_COLOR","color":"green"}"#,
            r#"{"type":"SET_TEXT"}"#,
            "[1,2]",
            "not json",
        ] {
            assert!(
                matches!(Action::from_json(json), Err(ContextError::MalformedAction(_))),
                "{json} should be malformed"
            );
        }
    }

    #[test]
    fn test_action_wire_shape() {
        assert_eq!(
            Action::SetCount { count: 5 }.to_json(),
            r#"{"type":"SET_COUNT","count":5}"#
        );
        assert_eq!(Action::ToggleGood.to_json(), r#"{"type":"TOGGLE_GOOD"}"#);
        assert_eq!(
            Action::from_json(r#"{"type":"SET_COLOR","color":"orange"}"#).unwrap(),
            Action::SetColor {
                color: Color::Orange
            }
        );
        for action in sequence() {
            assert!(Action::TAGS.contains(&action.tag()));
        }
    }

    #[test]
    fn test_state_serializes_camel_case() {
        let v = serde_json::to_value(SampleState::default()).unwrap();
        assert_eq!(
            v,
            serde_json::json!({"count": 0, "text": "hello", "color": "red", "isGood": true})
        );
    }

    #[test]
    fn test_color_names() {
        assert_eq!("orange".parse::<Color>().unwrap(), Color::Orange);
        assert_eq!(Color::Yellow.to_string(), "yellow");
        assert!(matches!(
            "Red".parse::<Color>(),
            Err(ContextError::UnknownColor(_))
        ));
    }

    #[test]
    fn test_nested_providers_shadow() {
        let outer = SampleProvider::new();
        let inner = SampleProvider::with_initial_state(SampleState {
            count: 100,
            ..SampleState::default()
        });

        outer.provide(|| {
            inner.provide(|| {
                assert_eq!(use_sample_state().count, 100);
                use_sample_dispatch().dispatch(Action::SetCount { count: 101 });
            });
            assert_eq!(use_sample_state().count, 0);
        });
        assert_eq!(inner.state().count, 101);
        assert_eq!(outer.state().count, 0);
    }

    #[test]
    fn test_dispatch_handle_is_stable() {
        let provider = SampleProvider::new();
        let (a, b) = provider.provide(|| (use_sample_dispatch(), use_sample_dispatch()));
        assert!(a.ptr_eq(&b));
        assert!(a.ptr_eq(&provider.dispatch()));
        assert!(!a.ptr_eq(&SampleProvider::new().dispatch()));

        // still drives the same store once the subtree has returned
        let cb = b.callback();
        cb(Action::ToggleGood);
        assert!(!provider.state().is_good);
    }

    #[test]
    fn test_frame_popped_on_panic() {
        let provider = SampleProvider::new();
        let result = catch_unwind(AssertUnwindSafe(|| {
            provider.provide(|| {
                assert_eq!(locals_depth(), 1);
                panic!("child failed");
            })
        }));
        assert!(result.is_err());
        assert_eq!(locals_depth(), 0);
        assert!(try_use_sample_state().is_err());
        assert!(current_scope().is_none());
    }

    #[test]
    fn test_observers_see_every_state_in_order() {
        let provider = SampleProvider::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        provider.provide(|| {
            let seen = seen.clone();
            observe_sample_state(move |s| seen.borrow_mut().push(s.clone())).unwrap();
        });
        let dispatch = provider.dispatch();
        for action in sequence() {
            dispatch.dispatch(action);
        }

        let seen = seen.borrow();
        assert_eq!(seen.len(), 4);
        assert_eq!(seen[0].count, 5);
        assert_eq!(seen[1].text, "world");
        assert!(!seen[2].is_good);
        assert_eq!(seen[3], final_state());
    }

    #[test]
    fn test_reentrant_dispatch_keeps_order() {
        let provider = SampleProvider::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let dispatch = provider.dispatch();
        provider.store().subscribe(move |s| {
            if s.count == 1 {
                // committed right away, delivered after this round
                dispatch.dispatch(Action::SetCount { count: 2 });
            }
        });
        {
            let seen = seen.clone();
            provider
                .store()
                .subscribe(move |s| seen.borrow_mut().push(s.count));
        }

        provider.dispatch().dispatch(Action::SetCount { count: 1 });
        assert_eq!(*seen.borrow(), vec![1, 2]);
        assert_eq!(provider.state().count, 2);
    }

    #[test]
    fn test_dispose_removes_observers() {
        let provider = SampleProvider::new();
        let hits = Rc::new(RefCell::new(0));

        provider.provide(|| {
            let hits = hits.clone();
            observe_sample_state(move |_| *hits.borrow_mut() += 1).unwrap();
        });
        assert_eq!(provider.store().subscriber_count(), 1);

        provider.dispatch().dispatch(Action::ToggleGood);
        assert_eq!(*hits.borrow(), 1);

        provider.dispose();
        assert!(provider.scope().is_disposed());
        assert_eq!(provider.store().subscriber_count(), 0);

        provider.dispatch().dispatch(Action::ToggleGood);
        assert_eq!(*hits.borrow(), 1);
        assert!(provider.state().is_good);
    }

    #[test]
    fn test_observe_after_dispose_is_rejected() {
        let provider = SampleProvider::new();
        let hits = Rc::new(RefCell::new(0));
        provider.dispose();

        let result = provider.provide(|| {
            let hits = hits.clone();
            observe_sample_state(move |_| *hits.borrow_mut() += 1)
        });
        match result {
            Err(ContextError::ScopeDisposed { context }) => assert_eq!(context, "SampleProvider"),
            other => panic!("expected ScopeDisposed, got {other:?}"),
        }
        assert_eq!(provider.store().subscriber_count(), 0);

        // state and dispatch still work on a disposed provider
        provider.dispatch().dispatch(Action::ToggleGood);
        assert_eq!(*hits.borrow(), 0);
        assert!(!provider.state().is_good);
    }

    #[test]
    fn test_reprovide_replaces_previous_observers() {
        let provider = SampleProvider::new();
        let hits = Rc::new(RefCell::new(0));

        for _ in 0..3 {
            provider.provide(|| {
                let hits = hits.clone();
                observe_sample_state(move |_| *hits.borrow_mut() += 1).unwrap();
            });
        }
        assert_eq!(provider.store().subscriber_count(), 1);

        provider.dispatch().dispatch(Action::ToggleGood);
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn test_nested_provide_shares_round() {
        let provider = SampleProvider::new();
        provider.provide(|| {
            observe_sample_state(|_| {}).unwrap();
            provider.provide(|| {
                observe_sample_state(|_| {}).unwrap();
            });
        });
        assert_eq!(provider.store().subscriber_count(), 2);
    }

    #[test]
    fn test_dropping_provider_removes_observers() {
        let provider = SampleProvider::new();
        let hits = Rc::new(RefCell::new(0));
        provider.provide(|| {
            let hits = hits.clone();
            observe_sample_state(move |_| *hits.borrow_mut() += 1).unwrap();
        });
        let dispatch = provider.dispatch();
        drop(provider);

        dispatch.dispatch(Action::SetCount { count: 9 });
        assert_eq!(*hits.borrow(), 0);
    }

    #[test]
    fn test_child_of_disposed_scope_is_disposed() {
        let scope = Scope::new();
        let live = scope.child();
        scope.dispose();
        assert!(live.is_disposed());

        let late = scope.child();
        assert!(late.is_disposed());
        let ran = Rc::new(RefCell::new(false));
        let flag = ran.clone();
        late.add_disposer(move || *flag.borrow_mut() = true);
        assert!(*ran.borrow());
    }

    #[test]
    fn test_scope_explicit_dispose() {
        let cleaned_up = Rc::new(RefCell::new(Vec::new()));

        let scope = Scope::new();
        let child = scope.child();
        {
            let log = cleaned_up.clone();
            scope.add_disposer(move || log.borrow_mut().push("parent"));
        }
        {
            let log = cleaned_up.clone();
            child.add_disposer(move || log.borrow_mut().push("child"));
        }

        assert!(cleaned_up.borrow().is_empty());
        scope.dispose();
        assert_eq!(*cleaned_up.borrow(), vec!["child", "parent"]);

        // already disposed: runs immediately, and only once
        scope.dispose();
        let log = cleaned_up.clone();
        scope.add_disposer(move || log.borrow_mut().push("late"));
        assert_eq!(cleaned_up.borrow().len(), 3);
    }

    #[test]
    fn test_scope_cleanup_on_drop() {
        let cleaned_up = Rc::new(RefCell::new(false));
        {
            let scope = Scope::new();
            let flag = cleaned_up.clone();
            scope.run(|| {
                scoped_effect(move || {
                    Box::new(move || *flag.borrow_mut() = true) as Box<dyn FnOnce()>
                })
            });
            assert!(!*cleaned_up.borrow());
        }
        assert!(*cleaned_up.borrow());
    }

    fn any_state() -> impl Strategy<Value = SampleState> {
        (
            any::<i64>(),
            "[a-z ]{0,12}",
            prop::sample::select(Color::ALL.to_vec()),
            any::<bool>(),
        )
            .prop_map(|(count, text, color, is_good)| SampleState {
                count,
                text,
                color,
                is_good,
            })
    }

    proptest! {
        #[test]
        fn prop_set_count_only_touches_count(s in any_state(), n in any::<i64>()) {
            let next = SampleReducer::reduce(&s, Action::SetCount { count: n });
            prop_assert_eq!(next.count, n);
            prop_assert_eq!(&next.text, &s.text);
            prop_assert_eq!(next.color, s.color);
            prop_assert_eq!(next.is_good, s.is_good);
        }

        #[test]
        fn prop_set_count_idempotent(s in any_state(), n in any::<i64>()) {
            let once = SampleReducer::reduce(&s, Action::SetCount { count: n });
            let twice = SampleReducer::reduce(&once, Action::SetCount { count: n });
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_toggle_involution(s in any_state()) {
            let back = SampleReducer::reduce(
                &SampleReducer::reduce(&s, Action::ToggleGood),
                Action::ToggleGood,
            );
            prop_assert_eq!(back, s);
        }

        #[test]
        fn prop_set_text_and_color(s in any_state(), t in "[a-z]{0,8}", c in prop::sample::select(Color::ALL.to_vec())) {
            let texted = SampleReducer::reduce(&s, Action::SetText { text: t.clone() });
            prop_assert_eq!(&texted, &SampleState { text: t, ..s.clone() });
            let colored = SampleReducer::reduce(&s, Action::SetColor { color: c });
            prop_assert_eq!(colored, SampleState { color: c, ..s });
        }
    }
}
