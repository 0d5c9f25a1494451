// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use fv_core::fixtures::raw_record;

#[tokio::test]
async fn fake_feed_replays_then_reports_no_data() {
    let feed = FakeFeedAdapter::new();
    feed.push_page(vec![("c1", raw_record("a", "2024-01-01T00:00:00Z", 1))], false);
    feed.push_error(FeedError::Transport("reset".to_string()));

    let first = feed.fetch_page(None).await.unwrap();
    assert_eq!(first.edge_count(), 1);

    let token = ContinuationToken::new("c1");
    assert!(feed.fetch_page(Some(&token)).await.is_err());
    assert_eq!(feed.fetch_page(Some(&token)).await.unwrap(), FeedPage::NoData);

    assert_eq!(
        feed.calls(),
        vec![
            FeedCall { after: None },
            FeedCall { after: Some(token.clone()) },
            FeedCall { after: Some(token) },
        ]
    );
    assert_eq!(feed.remaining(), 0);
}
