use super::{roller::Roller, Function, Registry, Value};
use crate::common::*;
use crate::error::{Error, Result};
use crate::parse::{self, Operand, PostfixItem};
use log::{debug, trace, warn};
use std::sync::Arc;

pub type DefaultRoller = rand::prelude::ThreadRng;

/// Parses and reduces expressions.
///
/// The scratch stack and the roller are owned by the evaluator, so one instance serves
/// one caller at a time. The [Registry] is shared and may back any number of evaluators.
///
/// # Examples
/// ```
/// # use parsemath::{Evaluator, Value};
/// let mut evaluator = Evaluator::new();
/// assert_eq!(evaluator.eval("1 + 2").unwrap(), Value::Int(3));
/// assert_eq!(evaluator.eval("2 / 4").unwrap(), Value::Float(0.5));
/// assert_eq!(evaluator.eval("1 > 2 or 2 > 1").unwrap(), Value::Bool(true));
/// ```
pub struct Evaluator<R = DefaultRoller> {
    registry: Arc<Registry>,
    stack: Vec<PostfixItem>,
    roller: R,
    max_rolls: Option<usize>,
    rolls: usize,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::with_roller(rand::thread_rng())
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Roller> Evaluator<R> {
    pub const DEFAULT_MAX_ROLLS: usize = 1000;

    pub fn with_roller(roller: R) -> Self {
        Self::with_registry(Arc::new(Registry::default()), roller)
    }

    pub fn with_registry(registry: Arc<Registry>, roller: R) -> Self {
        Self {
            registry,
            stack: Vec::new(),
            roller,
            max_rolls: Some(Self::DEFAULT_MAX_ROLLS),
            rolls: 0,
        }
    }

    /// Limits how many dice a single evaluation may roll; `None` removes the limit.
    pub fn max_rolls(mut self, max_rolls: Option<usize>) -> Self {
        self.max_rolls = max_rolls;
        self
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn eval(&mut self, expression: &str) -> Result<Value> {
        self.stack.clear();
        self.rolls = 0;

        if let Err(why) = parse::parse_into(expression, &mut self.stack) {
            warn!("failed to parse {:?}: {}", expression, why);
            return Err(why.into());
        }
        debug!("parsed {:?} into {} postfix items", expression, self.stack.len());

        let value = self.reduce()?;
        if self.stack.is_empty() {
            Ok(value)
        } else {
            Err(Error::MalformedStack)
        }
    }

    /// Reduces the item on top of the stack, taking operands from below it.
    ///
    /// Items are popped back to front, so a right operand is reduced (and its dice
    /// rolled) before its left operand. Operators waiting for operands are kept on
    /// `pending` rather than the call stack.
    fn reduce(&mut self) -> Result<Value> {
        let registry = Arc::clone(&self.registry);
        let mut pending: Vec<Pending> = Vec::new();

        'items: loop {
            let item = self.stack.pop().ok_or(Error::MalformedStack)?;
            let mut value = match item {
                PostfixItem::UnaryMinus => {
                    pending.push(Pending::new(Reduction::Negate, 1));
                    continue;
                }
                PostfixItem::Binary(op) => {
                    pending.push(Pending::new(Reduction::Binary(op), 2));
                    continue;
                }
                PostfixItem::Call(call) => {
                    let function = lookup(&registry, &call.name, call.argc)?;
                    if call.argc > 0 {
                        pending.push(Pending::new(Reduction::Call(function), call.argc));
                        continue;
                    }
                    function.call(&[])?
                }
                PostfixItem::Dice(dice) => self.roll(dice)?,
                PostfixItem::Operand(Operand::Literal(text)) => {
                    Value::from_literal(&text).ok_or(Error::InvalidLiteral(text))?
                }
                PostfixItem::Operand(Operand::Identifier(name)) => resolve(&registry, &name)?,
            };

            while let Some(mut top) = pending.pop() {
                top.args.push(value);
                if top.args.len() < top.argc {
                    pending.push(top);
                    continue 'items;
                }
                value = top.finish()?;
            }
            return Ok(value);
        }
    }

    fn count_rolls(&mut self, n: usize) -> Result<()> {
        self.rolls = self.rolls.saturating_add(n);
        if self.max_rolls.map_or(false, |max| self.rolls > max) {
            Err(Error::TooManyRolls)
        } else {
            Ok(())
        }
    }

    fn roll(&mut self, dice: Dice) -> Result<Value> {
        self.count_rolls(dice.num.get())?;
        let total = self.roller.roll_sum(dice.num.get(), dice.sides);
        trace!("rolled {}: {}", dice, total);
        Ok(Int::try_from(total).map_or(Value::Float(total as Float), Value::Int))
    }
}

enum Reduction<'r> {
    Negate,
    Binary(BinaryOperator),
    Call(&'r Function),
}

/// An operator whose operands are still being reduced, collected right to left.
struct Pending<'r> {
    reduction: Reduction<'r>,
    argc: usize,
    args: Vec<Value>,
}

impl<'r> Pending<'r> {
    fn new(reduction: Reduction<'r>, argc: usize) -> Self {
        Self {
            reduction,
            argc,
            args: Vec::with_capacity(argc),
        }
    }

    fn finish(self) -> Result<Value> {
        let Pending {
            reduction,
            mut args,
            ..
        } = self;
        match reduction {
            Reduction::Negate => args.pop().map(Value::neg).ok_or(Error::MalformedStack),
            Reduction::Binary(op) => match args[..] {
                [rhs, lhs] => op.apply(lhs, rhs),
                _ => Err(Error::MalformedStack),
            },
            Reduction::Call(function) => {
                args.reverse();
                function.call(&args)
            }
        }
    }
}

fn resolve(registry: &Registry, name: &str) -> Result<Value> {
    if let Some(value) = registry.constant(name) {
        Ok(value)
    } else if registry.function(name).is_some() {
        lookup(registry, name, 0)?.call(&[])
    } else {
        Err(Error::InvalidIdentifier(name.to_string()))
    }
}

/// Finds a function and checks that it takes `argc` arguments.
fn lookup<'r>(registry: &'r Registry, name: &str, argc: usize) -> Result<&'r Function> {
    let function = registry
        .function(name)
        .ok_or_else(|| Error::InvalidIdentifier(name.to_string()))?;

    if function.arity().accepts(argc) {
        Ok(function)
    } else {
        Err(Error::argument_count(name, function.arity(), argc))
    }
}
