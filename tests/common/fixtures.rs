//! Fixture source trees and described types.
//!
//! The `shop` registry covers every path through a pass:
//!
//! | Type | What it exercises |
//! |------|-------------------|
//! | `shop.Cart` | one no-arg constructor, two no-arg methods |
//! | `shop.Checkout` | single-parameter injection of a `Cart` |
//! | `shop.Faulty` | panicking constructor, raising method |
//! | `shop.PaymentGateway` | interface covered through a stand-in |
//! | `shop.Slow` | method that never returns in time, synthetic member |
//! | `shop.Wallet` | sorted after `Slow`, proves the pass went on |

use coverage_types::{Fault, PrimitiveKind, TypeDescriptor, TypeRef, Value, Visibility};
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use super_coverage::{CoverageConfig, SourceLayout, TypeRegistry};
use tempfile::TempDir;

/// Every `shop` type, in discovery order.
pub const SHOP_TYPES: [&str; 6] = [
    "shop.Cart",
    "shop.Checkout",
    "shop.Faulty",
    "shop.PaymentGateway",
    "shop.Slow",
    "shop.Wallet",
];

/// Source tree in a temporary directory, laid out with the default layout.
pub struct SourceTree {
    dir: TempDir,
}

impl SourceTree {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn with_types(names: &[&str]) -> Self {
        let tree = Self::new();
        for name in names {
            tree.add_type(name);
        }
        tree
    }

    /// Write the source file `name` maps from.
    pub fn add_type(&self, name: &str) -> PathBuf {
        let layout = SourceLayout::default();
        let relative = format!(
            "{}{}.{}",
            layout.unix_prefix(),
            name.replace('.', "/"),
            layout.extension
        );
        self.add_file(&relative)
    }

    pub fn add_file(&self, relative: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "// fixture\n").unwrap();
        path
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Ordered record of every fixture body that ran.
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub struct Shop {
    pub registry: TypeRegistry,
    pub calls: CallLog,
}

impl Shop {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn count(&self, entry: &str) -> usize {
        self.calls.lock().iter().filter(|c| c.as_str() == entry).count()
    }
}

/// Progress output off, failures on, short method deadline.
pub fn quiet_config() -> CoverageConfig {
    CoverageConfig::quiet().with_timeout(Duration::from_millis(150))
}

struct Cart;

struct Checkout {
    cart_is_real: bool,
}

struct Faulty {
    seed: i32,
}

struct Slow;

struct Wallet;

fn logging(calls: &CallLog, entry: &'static str) -> impl Fn() + Send + Sync + 'static {
    let calls = Arc::clone(calls);
    move || calls.lock().push(entry.to_string())
}

pub fn shop() -> Shop {
    let calls: CallLog = Arc::default();

    let cart = {
        let total = logging(&calls, "Cart.total");
        let clear = logging(&calls, "Cart.clear");
        TypeDescriptor::builder("shop.Cart")
            .constructor(vec![], |_| Ok(Cart))
            .method::<Cart, _>(
                "total",
                vec![],
                TypeRef::Primitive(PrimitiveKind::Long),
                move |_, _| {
                    total();
                    Ok(Value::Long(0))
                },
            )
            .method::<Cart, _>("clear", vec![], TypeRef::Unit, move |_, _| {
                clear();
                Ok(Value::Unit)
            })
            .build()
    };

    let checkout = {
        let built = Arc::clone(&calls);
        let pay = logging(&calls, "Checkout.pay");
        TypeDescriptor::builder("shop.Checkout")
            .constructor(vec![TypeRef::named("shop.Cart")], move |args| {
                let cart_is_real = args[0]
                    .as_object()
                    .map(|o| o.downcast_ref::<Cart>().is_some())
                    .unwrap_or(false);
                built.lock().push(format!("Checkout(real cart: {})", cart_is_real));
                Ok(Checkout { cart_is_real })
            })
            .method::<Checkout, _>(
                "pay",
                vec![TypeRef::named("shop.PaymentGateway"), TypeRef::Boxed(PrimitiveKind::Long)],
                TypeRef::Primitive(PrimitiveKind::Bool),
                move |checkout, args| {
                    pay();
                    let gateway = args[0].as_object().ok_or_else(|| Fault::raised("no gateway"))?;
                    // Stand-in answers with the zero value for `boolean`.
                    let charged =
                        gateway.call("charge", &[Value::Long(0), Value::Text(String::new())])?;
                    Ok(Value::Bool(checkout.cart_is_real && charged == Value::Bool(false)))
                },
            )
            .build()
    };

    let faulty = {
        let fine = logging(&calls, "Faulty.fine");
        TypeDescriptor::builder("shop.Faulty")
            .constructor::<Faulty, _>(vec![], |_| panic!("faulty default constructor"))
            .constructor_with(
                Visibility::Private,
                vec![TypeRef::Primitive(PrimitiveKind::Int)],
                |args| {
                    Ok(Faulty {
                        seed: args[0].as_int().unwrap_or(-1),
                    })
                },
            )
            .method::<Faulty, _>("explode", vec![TypeRef::Text], TypeRef::Unit, |_, args| {
                Err(Fault::raised(format!("cannot handle {}", args[0])))
            })
            .method_with::<Faulty, _>(
                Visibility::Protected,
                "fine",
                vec![],
                TypeRef::Primitive(PrimitiveKind::Int),
                move |f, _| {
                    fine();
                    Ok(Value::Int(f.seed))
                },
            )
            .build()
    };

    let gateway = TypeDescriptor::builder("shop.PaymentGateway")
        .interface()
        .abstract_method(
            "charge",
            vec![TypeRef::Primitive(PrimitiveKind::Long), TypeRef::Text],
            TypeRef::Primitive(PrimitiveKind::Bool),
        )
        .abstract_method("refund", vec![TypeRef::named("shop.Cart")], TypeRef::Unit)
        .build();

    let slow = {
        let wake = logging(&calls, "Slow.wake");
        let bridge = logging(&calls, "Slow.access$000");
        TypeDescriptor::builder("shop.Slow")
            .constructor(vec![], |_| Ok(Slow))
            .method::<Slow, _>("block", vec![], TypeRef::Unit, |_, _| {
                std::thread::sleep(Duration::from_secs(30));
                Ok(Value::Unit)
            })
            .method::<Slow, _>("wake", vec![], TypeRef::Unit, move |_, _| {
                wake();
                Ok(Value::Unit)
            })
            .synthetic_method::<Slow, _>("access$000", vec![], TypeRef::Unit, move |_, _| {
                bridge();
                Ok(Value::Unit)
            })
            .build()
    };

    let wallet = {
        let balance = logging(&calls, "Wallet.balance");
        TypeDescriptor::builder("shop.Wallet")
            .constructor(vec![], |_| Ok(Wallet))
            .method::<Wallet, _>(
                "balance",
                vec![],
                TypeRef::Boxed(PrimitiveKind::Double),
                move |_, _| {
                    balance();
                    Ok(Value::boxed_zero(PrimitiveKind::Double))
                },
            )
            .build()
    };

    let registry = TypeRegistry::new()
        .with(cart)
        .with(checkout)
        .with(faulty)
        .with(gateway)
        .with(slow)
        .with(wallet);

    Shop { registry, calls }
}
