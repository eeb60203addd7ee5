//! Coverage passes started from inside an async test runtime.

mod common;

use common::{assert_method_status, quiet_config, shop, SourceTree};
use super_coverage::{Coverager, InvocationStatus};

#[tokio::test]
async fn test_coverage_inside_current_thread_runtime() {
    let tree = SourceTree::with_types(&["shop.Cart"]);
    let shop = shop();
    Coverager::new(shop.registry.clone())
        .with_strategy(quiet_config())
        .with_root(tree.path())
        .coverage()
        .unwrap();
    assert_eq!(shop.calls(), vec!["Cart.total", "Cart.clear"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_full_pass_inside_multi_thread_runtime() {
    let tree = SourceTree::with_types(&["shop.Faulty", "shop.Slow", "shop.Wallet"]);
    let shop = shop();
    let report = Coverager::new(shop.registry.clone())
        .with_strategy(quiet_config())
        .with_root(tree.path())
        .run()
        .unwrap();

    assert_method_status(&report, "shop.Faulty", "explode", InvocationStatus::Failed);
    assert_method_status(&report, "shop.Slow", "block", InvocationStatus::TimedOut);
    assert_method_status(&report, "shop.Wallet", "balance", InvocationStatus::Completed);
}
