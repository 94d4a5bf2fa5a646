use crate::condition::ConditionNode;
use crate::model::{OperationContext, Plugin, RegisteredPlugin};
use darc_types::{Address, HookPoint, PluginId, ReturnType};

/// Deterministic address for a small integer.
pub fn addr(n: u64) -> Address {
    Address::parse(&format!("0x{n:040x}")).expect("generated address is valid")
}

pub fn ctx(caller: u64, targets: &[u64]) -> OperationContext {
    OperationContext::new(addr(caller), targets.iter().copied().map(addr).collect())
}

pub fn caller_is(n: u64) -> ConditionNode {
    ConditionNode::caller_equals(addr(n))
}

/// `n` negations around a `caller_is(1)` leaf; depth is `n + 1`.
pub fn chain_of_nots(n: usize) -> ConditionNode {
    (0..n).fold(caller_is(1), |node, _| ConditionNode::negate(node))
}

pub fn before_op(condition: ConditionNode, return_type: ReturnType, level: u64) -> Plugin {
    Plugin::new(HookPoint::BeforeOperation, condition, return_type).with_level(level)
}

pub fn after_op(condition: ConditionNode, return_type: ReturnType, level: u64) -> Plugin {
    Plugin::new(HookPoint::AfterOperation, condition, return_type).with_level(level)
}

/// Assign ids 1..=n in order, as a fresh registry would.
pub fn registered(plugins: Vec<Plugin>) -> Vec<RegisteredPlugin> {
    plugins
        .into_iter()
        .zip(1u64..)
        .map(|(plugin, id)| RegisteredPlugin {
            id: PluginId(id),
            plugin,
        })
        .collect()
}
