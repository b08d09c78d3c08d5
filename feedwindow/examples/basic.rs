// Example: drive a virtualized feed with an in-memory source and a simulated scroll.
use feedwindow::{Feed, FeedEvent, FeedOptions, Post, RenderMode};

fn fetch(start: usize, limit: usize) -> Vec<Post> {
    (start..(start + limit).min(100))
        .map(|i| Post {
            id: i as u64 + 1,
            owner_id: (i / 10) as u64 + 1,
            title: format!("post {}", i + 1),
            body: String::new(),
        })
        .collect()
}

fn main() {
    let mut feed = Feed::new(FeedOptions::default(), RenderMode::Virtualized);
    let mut pending = feed.handle(FeedEvent::Mounted { scroll_offset: 0 });

    for offset in (0..=18_000u64).step_by(900) {
        while let Some(request) = pending.take() {
            println!("fetch page={} start={}", request.page, request.start);
            let result = Ok(fetch(request.start, request.limit));
            pending = feed.handle(FeedEvent::PageLoaded { request, result });
        }
        pending = feed.handle(FeedEvent::Scrolled { offset });

        let range = feed.range();
        println!(
            "offset={offset} loaded={} rendering={} range={}..={}",
            feed.items().len(),
            feed.window().len(),
            range.start_index,
            range.end_index
        );
    }

    let status = feed.status();
    println!("end_of_list={:?}", status.end_of_list);
}
