use crate::*;

use alloc::format;
use alloc::string::ToString;
use alloc::vec::Vec;

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_u64(&mut self, start: u64, end_exclusive: u64) -> u64 {
        debug_assert!(start < end_exclusive);
        let span = end_exclusive - start;
        start + (self.next_u64() % span)
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        self.gen_range_u64(start as u64, end_exclusive as u64) as usize
    }

    fn gen_range_u32(&mut self, start: u32, end_exclusive: u32) -> u32 {
        self.gen_range_u64(start as u64, end_exclusive as u64) as u32
    }
}

fn posts(start: usize, count: usize) -> Vec<Post> {
    (start..start + count)
        .map(|i| Post {
            id: i as u64 + 1,
            owner_id: (i / 10) as u64 + 1,
            title: format!("post {}", i + 1),
            body: "body".to_string(),
        })
        .collect()
}

fn serve(request: PageRequest, total: usize) -> Result<Vec<Post>, FetchError> {
    let end = (request.start + request.limit).min(total);
    Ok(posts(request.start, end.saturating_sub(request.start)))
}

#[test]
fn empty_list_yields_zero_range() {
    for offset in [0u64, 1, 599, 10_000] {
        let r = calculate_visible_range(offset, 180, 600, 0, 3);
        assert_eq!(r, VisibleRange::default());
    }
}

#[test]
fn range_matches_reference_scenario() {
    let r = calculate_visible_range(900, 180, 600, 50, 3);
    assert_eq!(r.visible_start_index, 5);
    assert_eq!(r.visible_end_index, 8);
    assert_eq!(r.start_index, 2);
    assert_eq!(r.end_index, 11);
}

#[test]
fn range_at_top_clamps_overscan() {
    let r = calculate_visible_range(0, 180, 600, 50, 3);
    assert_eq!(r.start_index, 0);
    assert_eq!(r.visible_start_index, 0);
    // Rows 0..=3 intersect [0, 600).
    assert_eq!(r.visible_end_index, 3);
    assert_eq!(r.end_index, 6);
}

#[test]
fn range_row_aligned_viewport_excludes_next_row() {
    // [0, 540) covers exactly rows 0, 1, 2.
    let r = calculate_visible_range(0, 180, 540, 50, 0);
    assert_eq!(r.visible_end_index, 2);
    assert_eq!(r.end_index, 2);
}

#[test]
fn range_past_end_clamps_to_last_row() {
    let r = calculate_visible_range(1_000_000, 180, 600, 10, 3);
    assert_eq!(r.visible_start_index, 9);
    assert_eq!(r.visible_end_index, 9);
    assert_eq!(r.start_index, 6);
    assert_eq!(r.end_index, 9);
}

#[test]
fn range_short_list_fits_in_viewport() {
    let r = calculate_visible_range(0, 180, 600, 2, 3);
    assert_eq!(r.start_index, 0);
    assert_eq!(r.visible_end_index, 1);
    assert_eq!(r.end_index, 1);
}

#[test]
fn range_ordering_invariant_holds_for_random_inputs() {
    let mut rng = Lcg::new(0x5eed_f33d);
    for _ in 0..5_000 {
        let offset = rng.gen_range_u64(0, 200_000);
        let item_height = rng.gen_range_u32(1, 400);
        let container_height = rng.gen_range_u32(1, 2_000);
        let total = rng.gen_range_usize(0, 600);
        let overscan = rng.gen_range_usize(0, 12);

        let r = calculate_visible_range(offset, item_height, container_height, total, overscan);
        if total == 0 {
            assert_eq!(r, VisibleRange::default());
            continue;
        }
        assert!(r.start_index <= r.visible_start_index, "{r:?}");
        assert!(r.visible_start_index <= r.visible_end_index, "{r:?}");
        assert!(r.visible_end_index <= r.end_index, "{r:?}");
        assert!(r.end_index < total, "{r:?} total={total}");
    }
}

#[test]
fn options_range_for_uses_configured_geometry() {
    let opts = FeedOptions::default();
    assert_eq!(
        opts.range_for(900, 50),
        calculate_visible_range(900, 180, 600, 50, 3)
    );
    assert_eq!(opts.total_height(12), 12 * 180);
}

#[test]
fn load_next_page_is_single_flight() {
    let mut loader = PageLoader::new(10, 100);
    let first = loader.load_next_page();
    let second = loader.load_next_page();
    assert!(first.is_some());
    assert_eq!(second, None);
    assert!(loader.is_loading());
    assert_eq!(loader.in_flight(), first);
}

#[test]
fn ten_pages_fill_the_known_total() {
    let mut loader = PageLoader::new(10, 100);
    let request = loader.mount().unwrap();
    assert_eq!(request.start, 0);
    assert_eq!(request.limit, 10);
    loader.complete(request, serve(request, 100));
    assert_eq!(loader.len(), 10);
    assert!(loader.has_next_page());

    for page in 1..10 {
        let request = loader.load_next_page().unwrap();
        assert_eq!(request.page, page);
        assert_eq!(request.start, page * 10);
        let outcome = loader.complete(request, serve(request, 100));
        assert_eq!(outcome, LoadOutcome::Appended { added: 10 });
    }

    assert_eq!(loader.len(), 100);
    assert_eq!(loader.page_cursor(), 10);
    assert!(!loader.has_next_page());
    assert_eq!(loader.load_next_page(), None);
    assert_eq!(loader.state(), LoadState::Idle);

    let ids: Vec<u64> = loader.items().iter().map(|p| p.id).collect();
    assert_eq!(ids, (1..=100).collect::<Vec<u64>>());
}

#[test]
fn sequence_grows_by_page_size_and_final_page_may_be_short() {
    let mut loader = PageLoader::new(10, 95);
    let mut lens = Vec::new();
    while let Some(request) = loader.load_next_page() {
        loader.complete(request, serve(request, 95));
        lens.push(loader.len());
    }
    assert_eq!(lens, [10, 20, 30, 40, 50, 60, 70, 80, 90, 95]);
}

#[test]
fn oversized_page_is_truncated_to_known_total() {
    let mut loader = PageLoader::new(10, 15);
    let request = loader.load_next_page().unwrap();
    loader.complete(request, Ok(posts(0, 10)));
    let request = loader.load_next_page().unwrap();
    let outcome = loader.complete(request, Ok(posts(10, 10)));
    assert_eq!(outcome, LoadOutcome::Appended { added: 5 });
    assert_eq!(loader.len(), 15);
    assert!(!loader.has_next_page());
}

#[test]
fn failed_page_keeps_items_and_retries_same_offset() {
    let mut loader = PageLoader::new(10, 100);
    let request = loader.mount().unwrap();
    loader.complete(request, serve(request, 100));

    let second = loader.load_next_page().unwrap();
    assert_eq!(second.start, 10);
    let outcome = loader.complete(second, Err(FetchError::Status(500)));
    assert_eq!(outcome, LoadOutcome::Failed);
    assert_eq!(loader.len(), 10);
    assert_eq!(loader.page_cursor(), 1);
    assert!(!loader.is_loading());
    assert_eq!(loader.error(), Some(&FetchError::Status(500)));
    assert_eq!(
        loader.error().map(|e| e.to_string()).as_deref(),
        Some("HTTP error! status: 500")
    );

    let retry = loader.load_next_page().unwrap();
    assert_eq!(retry.start, 10);
    assert_eq!(retry.page, 1);
    assert_eq!(loader.error(), None);
}

#[test]
fn reset_clears_state_and_rearms_mount() {
    let mut loader = PageLoader::new(10, 100);
    let request = loader.mount().unwrap();
    loader.complete(request, serve(request, 100));
    assert_eq!(loader.mount(), None);

    loader.reset();
    assert!(loader.is_empty());
    assert_eq!(loader.page_cursor(), 0);
    assert_eq!(loader.state(), LoadState::Idle);
    assert_eq!(loader.error(), None);
    assert!(loader.has_next_page());
    assert_eq!(loader.generation(), 1);

    let request = loader.mount().unwrap();
    assert_eq!(request.start, 0);
    assert_eq!(request.generation, 1);
}

#[test]
fn response_issued_before_reset_is_discarded() {
    let mut loader = PageLoader::new(10, 100);
    let stale = loader.mount().unwrap();
    loader.reset();

    assert_eq!(loader.complete(stale, serve(stale, 100)), LoadOutcome::Stale);
    assert!(loader.is_empty());
    assert_eq!(loader.page_cursor(), 0);

    // A request of the new generation is unaffected by the stale completion.
    let fresh = loader.load_next_page().unwrap();
    assert_eq!(loader.complete(stale, Err(FetchError::Status(503))), LoadOutcome::Stale);
    assert!(loader.is_loading());
    assert_eq!(loader.error(), None);
    loader.complete(fresh, serve(fresh, 100));
    assert_eq!(loader.len(), 10);
}

#[test]
fn abandon_releases_loading_flag() {
    let mut loader = PageLoader::new(10, 100);
    let request = loader.load_next_page().unwrap();
    assert!(loader.abandon(request));
    assert!(!loader.is_loading());
    assert!(loader.is_empty());
    assert!(!loader.abandon(request));
    assert!(loader.load_next_page().is_some());
}

#[test]
fn load_more_policy() {
    assert!(should_load_more(6, 10, true, false, 5));
    assert!(!should_load_more(4, 10, true, false, 5));
    assert!(should_load_more(5, 10, true, false, 5));
    assert!(!should_load_more(9, 10, false, false, 5));
    assert!(!should_load_more(9, 10, true, true, 5));
    assert!(!should_load_more(0, 0, true, false, 5));
    // Buffer larger than the loaded count never underflows.
    assert!(should_load_more(0, 3, true, false, 5));
}

#[test]
fn document_bottom_threshold() {
    assert!(policy::near_document_bottom(1000, 800, 2000, 200));
    assert!(!policy::near_document_bottom(999, 800, 2000, 200));
    assert!(policy::near_document_bottom(0, 800, 100, 200));
}

#[test]
fn scroll_tracker_publishes_every_event_while_attached() {
    let mut s = ScrollTracker::new();
    assert!(!s.on_scroll(10));
    assert_eq!(s.offset(), 0);

    s.attach(40);
    assert_eq!(s.offset(), 40);
    assert!(s.on_scroll(100));
    assert_eq!(s.direction(), Some(ScrollDirection::Forward));
    assert!(!s.on_scroll(100));
    assert!(s.on_scroll(20));
    assert_eq!(s.direction(), Some(ScrollDirection::Backward));
    assert_eq!(s.event_count(), 3);

    s.detach();
    assert!(!s.on_scroll(500));
    assert_eq!(s.offset(), 20);
}

#[test]
fn intersection_respects_margin_and_threshold() {
    let root = Span::new(0, 100);
    let none = ObserverConfig::new(0.0, 0);
    assert!(visibility::intersects(Span::new(50, 10), root, none));
    // Touching the edge counts as intersecting.
    assert!(visibility::intersects(Span::new(100, 10), root, none));
    assert!(!visibility::intersects(Span::new(150, 10), root, none));
    assert!(visibility::intersects(
        Span::new(150, 10),
        root,
        ObserverConfig::new(0.0, 100)
    ));

    let half = ObserverConfig::new(0.5, 0);
    assert!(visibility::intersects(Span::new(90, 20), root, half));
    assert!(!visibility::intersects(
        Span::new(90, 20),
        root,
        ObserverConfig::new(0.6, 0)
    ));

    // Zero-sized sentinels are fully visible when inside the root.
    assert!(visibility::intersects(Span::new(30, 0), root, half));
    assert!(!visibility::intersects(Span::new(130, 0), root, half));
}

#[test]
fn visibility_trigger_reconnects_on_config_change() {
    let mut t = VisibilityTrigger::new(ObserverConfig::new(0.0, 100));
    let id = t.observer_id();
    assert_eq!(t.observe(Span::new(650, 10), Span::new(0, 600)), Some(true));
    assert!(t.is_intersecting());

    assert!(!t.set_config(ObserverConfig::new(0.0, 100)));
    assert_eq!(t.observer_id(), id);
    assert!(t.is_intersecting());

    assert!(t.set_config(ObserverConfig::new(0.0, 0)));
    assert_eq!(t.observer_id(), id + 1);
    assert!(!t.is_intersecting());
    assert_eq!(t.observe(Span::new(650, 10), Span::new(0, 600)), Some(false));

    t.disconnect();
    assert_eq!(t.observe(Span::new(10, 10), Span::new(0, 600)), None);
    assert!(!t.is_intersecting());
}

#[test]
fn window_skips_rows_beyond_loaded_items() {
    let items = posts(0, 5);
    let range = VisibleRange {
        start_index: 2,
        end_index: 9,
        visible_start_index: 3,
        visible_end_index: 6,
    };
    let window = compose_window(&items, range, 180);
    let indexes: Vec<usize> = window.iter().map(|w| w.index).collect();
    assert_eq!(indexes, [2, 3, 4]);
    assert_eq!(window[0].top, 360);
    assert_eq!(window[2].item.id, 5);

    assert!(compose_window(&[], range, 180).is_empty());
    assert_eq!(compose::total_height(items.len(), 180), 900);
}

#[test]
fn regular_mode_positions_every_item() {
    let items = posts(0, 4);
    let all = compose_all(&items, 50);
    assert_eq!(all.len(), 4);
    assert_eq!(all[3].top, 150);
}

#[test]
fn skeletons_follow_the_last_row() {
    let tops: Vec<u64> = compose::skeleton_slots(10, 3, 180).collect();
    assert_eq!(tops, [1800, 1980, 2160]);
}

#[test]
fn status_distinguishes_blocking_and_inline_errors() {
    let mut loader = PageLoader::new(10, 100);
    let request = loader.mount().unwrap();
    let status = FeedStatus::from_loader(&loader, 3);
    assert!(status.initial_skeleton);
    assert_eq!(status.skeleton_rows, 3);

    loader.complete(request, Err(FetchError::transport("connection refused")));
    let status = FeedStatus::from_loader(&loader, 3);
    assert!(status.is_blocking_error());
    assert!(!status.initial_skeleton);

    let request = loader.load_next_page().unwrap();
    loader.complete(request, serve(request, 100));
    let request = loader.load_next_page().unwrap();
    loader.complete(request, Err(FetchError::Status(502)));
    let status = FeedStatus::from_loader(&loader, 3);
    assert_eq!(
        status.error,
        Some((FetchError::Status(502), ErrorDisplay::Inline))
    );
    assert_eq!(status.loaded, 10);
    assert!(status.sentinel);
    assert_eq!(status.end_of_list, None);
}

#[test]
fn status_reports_end_of_list() {
    let mut loader = PageLoader::new(10, 20);
    while let Some(request) = loader.load_next_page() {
        loader.complete(request, serve(request, 20));
    }
    let status = FeedStatus::from_loader(&loader, 3);
    assert_eq!(status.end_of_list, Some(20));
    assert!(!status.sentinel);
    assert_eq!(status.skeleton_rows, 0);
}

#[test]
fn virtualized_feed_loads_as_range_approaches_end() {
    let mut feed = Feed::new(FeedOptions::default(), RenderMode::Virtualized);
    assert_eq!(feed.handle(FeedEvent::Scrolled { offset: 100 }), None);

    let first = feed.handle(FeedEvent::Mounted { scroll_offset: 0 }).unwrap();
    assert_eq!(feed.last_trigger(), Some(LoadTrigger::Mount));
    // Concurrent triggers while the first page is in flight are dropped.
    assert_eq!(feed.handle(FeedEvent::Retry), None);
    assert_eq!(feed.handle(FeedEvent::Scrolled { offset: 10 }), None);

    // Ten rows: the rendered range ends at 6, within the buffer of 5.
    let second = feed
        .handle(FeedEvent::PageLoaded {
            request: first,
            result: serve(first, 100),
        })
        .unwrap();
    assert_eq!(second.start, 10);
    assert_eq!(feed.last_trigger(), Some(LoadTrigger::RangeNearEnd));

    let next = feed.handle(FeedEvent::PageLoaded {
        request: second,
        result: serve(second, 100),
    });
    assert_eq!(next, None);
    assert_eq!(feed.items().len(), 20);
    assert_eq!(feed.total_height(), 20 * 180);

    let third = feed
        .handle(FeedEvent::Scrolled { offset: 12 * 180 })
        .unwrap();
    assert_eq!(third.start, 20);
    assert_eq!(feed.range().visible_start_index, 12);
    assert_eq!(feed.range().end_index, 18);

    let window = feed.window();
    assert_eq!(window.first().map(|w| w.index), Some(9));
    assert_eq!(window.last().map(|w| w.index), Some(18));
    assert_eq!(feed.skeleton_tops(), [3600, 3780, 3960]);
}

#[test]
fn feed_discards_pages_from_before_reset() {
    let mut feed = Feed::new(FeedOptions::default(), RenderMode::Virtualized);
    let stale = feed.handle(FeedEvent::Mounted { scroll_offset: 0 }).unwrap();
    assert_eq!(feed.handle(FeedEvent::Reset), None);

    let result = feed.handle(FeedEvent::PageLoaded {
        request: stale,
        result: serve(stale, 100),
    });
    assert_eq!(result, None);
    assert!(feed.items().is_empty());

    let fresh = feed.handle(FeedEvent::Mounted { scroll_offset: 0 }).unwrap();
    assert_eq!(fresh.generation, stale.generation + 1);
    assert_eq!(fresh.start, 0);
}

#[test]
fn feed_retry_after_failure_refetches_same_page() {
    let mut feed = Feed::new(FeedOptions::default(), RenderMode::Virtualized);
    let first = feed.handle(FeedEvent::Mounted { scroll_offset: 0 }).unwrap();
    let failed = feed.handle(FeedEvent::PageLoaded {
        request: first,
        result: Err(FetchError::Status(500)),
    });
    assert_eq!(failed, None);
    assert!(feed.status().is_blocking_error());

    let retry = feed.handle(FeedEvent::Retry).unwrap();
    assert_eq!(retry.start, 0);
    assert_eq!(feed.last_trigger(), Some(LoadTrigger::Retry));
    assert_eq!(feed.status().error, None);
}

#[test]
fn regular_feed_uses_sentinel_and_bottom_threshold() {
    let mut feed = Feed::new(FeedOptions::default(), RenderMode::Regular);
    let first = feed.handle(FeedEvent::Mounted { scroll_offset: 0 }).unwrap();
    assert_eq!(
        feed.handle(FeedEvent::PageLoaded {
            request: first,
            result: serve(first, 100),
        }),
        None
    );
    assert_eq!(feed.window().len(), 10);

    let viewport = Span::new(0, 800);
    assert_eq!(
        feed.handle(FeedEvent::SentinelObserved {
            sentinel: Span::new(1900, 10),
            viewport,
        }),
        None
    );
    let second = feed
        .handle(FeedEvent::SentinelObserved {
            sentinel: Span::new(850, 10),
            viewport,
        })
        .unwrap();
    assert_eq!(second.start, 10);
    assert_eq!(feed.last_trigger(), Some(LoadTrigger::SentinelVisible));

    let near_bottom = FeedEvent::WindowScrolled {
        scroll_top: 1000,
        window_height: 800,
        document_height: 2000,
    };
    assert_eq!(feed.handle(near_bottom.clone()), None);

    // The sentinel is still in view, so completion immediately queues the next page.
    let third = feed
        .handle(FeedEvent::PageLoaded {
            request: second,
            result: serve(second, 100),
        })
        .unwrap();
    assert_eq!(third.start, 20);

    feed.handle(FeedEvent::ObserverConfigured(ObserverConfig::new(0.0, 0)));
    assert!(!feed.visibility().is_intersecting());
    let fourth = feed.handle(FeedEvent::PageLoaded {
        request: third,
        result: serve(third, 100),
    });
    assert_eq!(fourth, None);

    let fourth = feed.handle(near_bottom).unwrap();
    assert_eq!(fourth.start, 30);
    assert_eq!(feed.last_trigger(), Some(LoadTrigger::NearDocumentBottom));
}

#[test]
fn window_scroll_is_ignored_in_virtualized_mode() {
    let mut feed = Feed::new(FeedOptions::default().with_page_size(20), RenderMode::Virtualized);
    let first = feed.handle(FeedEvent::Mounted { scroll_offset: 0 }).unwrap();
    feed.handle(FeedEvent::PageLoaded {
        request: first,
        result: serve(first, 100),
    });
    let event = FeedEvent::WindowScrolled {
        scroll_top: 10_000,
        window_height: 800,
        document_height: 2000,
    };
    assert_eq!(feed.handle(event), None);
}

#[test]
fn teardown_stops_all_triggers() {
    let mut feed = Feed::new(FeedOptions::default(), RenderMode::Regular);
    let first = feed.handle(FeedEvent::Mounted { scroll_offset: 0 }).unwrap();
    feed.handle(FeedEvent::PageLoaded {
        request: first,
        result: serve(first, 100),
    });
    feed.handle(FeedEvent::Teardown);
    assert!(!feed.is_active());
    assert!(!feed.scroll().is_attached());
    assert_eq!(feed.handle(FeedEvent::Retry), None);
    assert_eq!(
        feed.handle(FeedEvent::SentinelObserved {
            sentinel: Span::new(10, 10),
            viewport: Span::new(0, 800),
        }),
        None
    );
    assert_eq!(
        feed.handle(FeedEvent::WindowScrolled {
            scroll_top: 2000,
            window_height: 800,
            document_height: 2000,
        }),
        None
    );
}

#[test]
fn mode_change_keeps_loaded_items() {
    let mut feed = Feed::new(FeedOptions::default().with_page_size(20), RenderMode::Regular);
    let first = feed.handle(FeedEvent::Mounted { scroll_offset: 0 }).unwrap();
    feed.handle(FeedEvent::PageLoaded {
        request: first,
        result: serve(first, 100),
    });
    assert_eq!(feed.window().len(), 20);

    // Rendered range ends at 6, far from the 20 loaded rows.
    assert_eq!(feed.handle(FeedEvent::ModeChanged(RenderMode::Virtualized)), None);
    assert_eq!(feed.mode(), RenderMode::Virtualized);
    assert_eq!(feed.items().len(), 20);
    assert_eq!(feed.window().len(), 7);
    assert_eq!(RenderMode::Virtualized.toggled(), RenderMode::Regular);
}

#[test]
fn viewport_resize_recomputes_range() {
    let mut feed = Feed::new(FeedOptions::default().with_page_size(50), RenderMode::Virtualized);
    let first = feed.handle(FeedEvent::Mounted { scroll_offset: 0 }).unwrap();
    feed.handle(FeedEvent::PageLoaded {
        request: first,
        result: serve(first, 100),
    });
    assert_eq!(feed.range().visible_end_index, 3);
    feed.handle(FeedEvent::ViewportResized {
        container_height: 1800,
    });
    assert_eq!(feed.range().visible_end_index, 9);
    assert_eq!(feed.range().end_index, 12);
}

#[test]
fn post_deserializes_from_source_json() {
    let json = r#"[{"userId":1,"id":3,"title":"ea molestias","body":"et iusto"}]"#;
    let parsed: Vec<Post> = serde_json::from_str(json).unwrap();
    assert_eq!(parsed[0].id, 3);
    assert_eq!(parsed[0].owner_id, 1);
    assert_eq!(parsed[0].title, "ea molestias");
}

#[test]
fn options_deserialize_with_defaults() {
    let opts: FeedOptions = serde_json::from_str(r#"{"page_size":25,"overscan":1}"#).unwrap();
    assert_eq!(opts.page_size, 25);
    assert_eq!(opts.overscan, 1);
    assert_eq!(opts.item_height, 180);
    assert_eq!(opts.observer, ObserverConfig::new(0.0, 100));
}
