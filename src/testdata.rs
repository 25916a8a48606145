//! Shared test fixtures: small but complete models exercising every
//! attribute kind.

use crate::function::{BoundAssoc, DiscretizeFunction, Function, TabularFunction};
use crate::model::{AttributeNode, Model};
use crate::scale::{ContinuousScale, DiscreteScale, Order, Scale};
use crate::value::Value;

fn scale<const N: usize>(values: [&str; N]) -> Scale {
    Scale::Discrete(DiscreteScale::new(values, Order::Ascending))
}

fn table(dim: Vec<usize>, rules: &str) -> Function {
    Function::Tabular(TabularFunction::from_rule_strings(dim, rules, None).unwrap())
}

/// The decision table of the CAR attribute: PRICE (3) x TECH.CHAR. (4).
pub fn car_table() -> TabularFunction {
    TabularFunction::from_rule_strings(vec![3, 4], "000001230233", None).unwrap()
}

/// A car selection model: CAR aggregates PRICE (buying and maintenance
/// price) and TECH.CHAR. (comfort over persons, doors and luggage, plus
/// safety). Two crisp alternatives are stored with the model.
pub fn car_model() -> Model {
    let price_scale = scale(["high", "medium", "low"]);
    let comfort = AttributeNode::new("COMFORT")
        .with_scale(scale(["small", "medium", "high"]))
        .with_funct(Function::Tabular(comfort_table()))
        .with_children([
            AttributeNode::new("#PERS")
                .with_scale(scale(["to_2", "3-4", "more"]))
                .with_cells([Value::Index(2), Value::Index(2)]),
            AttributeNode::new("#DOORS")
                .with_scale(scale(["2", "3", "4", "more"]))
                .with_cells([Value::Index(2), Value::Index(2)]),
            AttributeNode::new("LUGGAGE")
                .with_scale(scale(["small", "medium", "big"]))
                .with_cells([Value::Index(2), Value::Index(2)]),
        ]);
    let tech = AttributeNode::new("TECH.CHAR.")
        .with_scale(scale(["bad", "acc", "good", "exc"]))
        .with_funct(table(vec![3, 3], "000011023"))
        .with_children([
            comfort,
            AttributeNode::new("SAFETY")
                .with_scale(scale(["small", "medium", "high"]))
                .with_cells([Value::Index(2), Value::Index(1)]),
        ]);
    let price = AttributeNode::new("PRICE")
        .with_scale(price_scale.clone())
        .with_funct(table(vec![3, 3], "000012022"))
        .with_children([
            AttributeNode::new("BUY.PRICE")
                .with_scale(price_scale.clone())
                .with_cells([Value::Index(1), Value::Index(1)]),
            AttributeNode::new("MAINT.PRICE")
                .with_scale(price_scale)
                .with_cells([Value::Index(2), Value::Index(1)]),
        ]);
    let car = AttributeNode::new("CAR")
        .with_scale(scale(["unacc", "acc", "good", "exc"]))
        .with_funct(Function::Tabular(car_table()))
        .with_children([price, tech]);
    let root = AttributeNode::new("CAR_MODEL").with_children([car]);
    Model::new(
        "CAR_MODEL",
        "Car selection",
        false,
        root,
        vec!["Car1".to_string(), "Car2".to_string()],
    )
    .unwrap()
}

/// COMFORT over #PERS (3) x #DOORS (4) x LUGGAGE (3): small when any
/// input is at its minimum, high when all are high enough.
fn comfort_table() -> TabularFunction {
    let mut cells = Vec::with_capacity(36);
    for p in 0..3usize {
        for d in 0..4usize {
            for l in 0..3usize {
                let v = if p == 0 || d == 0 || l == 0 {
                    0
                } else if p >= 2 && d >= 2 && l >= 2 {
                    2
                } else {
                    1
                };
                cells.push(Value::Index(v));
            }
        }
    }
    TabularFunction::new(vec![3, 4, 3], cells).unwrap()
}

/// A model with three repeated basic attribute names. With linking on, the
/// repeats resolve to the last basic occurrences (under MID), so values
/// need only be supplied once.
pub fn linked_model() -> Model {
    let three = scale(["low", "med", "high"]);
    let pair = |name: &str, rules: &str| {
        AttributeNode::new(name)
            .with_scale(three.clone())
            .with_funct(table(vec![3, 3], rules))
            .with_children([
                AttributeNode::new("A").with_scale(three.clone()),
                AttributeNode::new("B").with_scale(three.clone()),
            ])
    };
    let linked = AttributeNode::new("LinkedTest")
        .with_scale(three.clone())
        .with_children([
            pair("MIN", "000011012"),
            pair("MAX", "012112222"),
            pair("MID", "001011112"),
        ]);
    // values live on the last occurrences, the link targets
    let mut root = AttributeNode::new("root").with_children([linked]);
    let mid = root.children[0].children.last_mut().unwrap();
    mid.children[0].cells = vec![Value::Index(0), Value::Index(1)];
    mid.children[1].cells = vec![Value::Index(2), Value::Index(1)];
    Model::new(
        "Linked",
        "",
        true,
        root,
        vec!["One".to_string(), "Two".to_string()],
    )
    .unwrap()
}

/// A model discretizing two continuous inputs before a tabular aggregation.
pub fn discretize_model() -> Model {
    let x1 = AttributeNode::new("X1")
        .with_scale(scale(["low", "high"]))
        .with_funct(Function::Discretize(DiscretizeFunction::new(
            vec![0.0],
            vec![BoundAssoc::Down],
            vec![Value::Index(0), Value::Index(1)],
        )))
        .with_children([AttributeNode::new("N1")
            .with_scale(Scale::Continuous(ContinuousScale::unbounded()))]);
    let x2 = AttributeNode::new("X2")
        .with_scale(scale(["low", "med", "high"]))
        .with_funct(Function::Discretize(DiscretizeFunction::new(
            vec![-1.0, 1.0],
            vec![BoundAssoc::Down, BoundAssoc::Down],
            vec![Value::Index(0), Value::Index(1), Value::Index(2)],
        )))
        .with_children([AttributeNode::new("N2").with_scale(Scale::Continuous(
            ContinuousScale::new(-1.0, 1.0, Order::Ascending),
        ))]);
    let y = AttributeNode::new("Y")
        .with_scale(scale(["low", "med", "high"]))
        .with_funct(Function::Tabular(
            TabularFunction::new(
                vec![2, 3],
                vec![
                    Value::Index(0),
                    Value::set([0, 1]),
                    Value::Index(1),
                    Value::set([1, 2]),
                    Value::set([1, 2]),
                    Value::Index(2),
                ],
            )
            .unwrap(),
        ))
        .with_children([x1, x2]);
    let root = AttributeNode::new("root").with_children([y]);
    Model::new("OneLevel", "", false, root, Vec::new()).unwrap()
}
