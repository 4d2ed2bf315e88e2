use fieldmap_core::{CanonicalType, SampleValue};

use crate::catalog::{Transform, TransformCategory, TransformOutput};
use crate::errors::EvaluationError;

pub(super) fn transforms() -> Vec<Box<dyn Transform>> {
    ArithmeticOp::ALL
        .into_iter()
        .map(|op| Box::new(ArithmeticTransform::neutral(op)) as Box<dyn Transform>)
        .collect()
}

/// Arithmetic applied to a numeric reading of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Multiply,
    Divide,
    Add,
    Subtract,
}

impl ArithmeticOp {
    pub const ALL: [ArithmeticOp; 4] = [
        ArithmeticOp::Multiply,
        ArithmeticOp::Divide,
        ArithmeticOp::Add,
        ArithmeticOp::Subtract,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ArithmeticOp::Multiply => "multiply",
            ArithmeticOp::Divide => "divide",
            ArithmeticOp::Add => "add",
            ArithmeticOp::Subtract => "subtract",
        }
    }

    /// Operand that leaves the input unchanged.
    pub fn neutral_operand(self) -> f64 {
        match self {
            ArithmeticOp::Multiply | ArithmeticOp::Divide => 1.0,
            ArithmeticOp::Add | ArithmeticOp::Subtract => 0.0,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ArithmeticOp::Multiply => "Multiply",
            ArithmeticOp::Divide => "Divide",
            ArithmeticOp::Add => "Add",
            ArithmeticOp::Subtract => "Subtract",
        }
    }

    /// Division by zero yields zero.
    fn eval(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            ArithmeticOp::Multiply => lhs * rhs,
            ArithmeticOp::Divide if rhs == 0.0 => 0.0,
            ArithmeticOp::Divide => lhs / rhs,
            ArithmeticOp::Add => lhs + rhs,
            ArithmeticOp::Subtract => lhs - rhs,
        }
    }
}

/// `multiply`, `divide`, `add` or `subtract` by a fixed operand.
///
/// Inputs that do not read as a number evaluate to `0.0`.
pub struct ArithmeticTransform {
    id: String,
    label: String,
    description: String,
    op: ArithmeticOp,
    operand: f64,
}

impl ArithmeticTransform {
    /// A transform with id `{op}_{operand}`, e.g. `multiply_100`.
    pub fn new(op: ArithmeticOp, operand: f64) -> Self {
        Self::with_id(format!("{}_{operand}", op.as_str()), op, operand)
    }

    /// The bare-named built-in (`multiply`, `add`, ...) with its neutral operand.
    pub fn neutral(op: ArithmeticOp) -> Self {
        Self::with_id(op.as_str().to_string(), op, op.neutral_operand())
    }

    fn with_id(id: String, op: ArithmeticOp, operand: f64) -> Self {
        Self {
            id,
            label: format!("{} ({operand})", op.label()),
            description: format!("{} the numeric value by {operand}", op.label()),
            op,
            operand,
        }
    }

    pub fn op(&self) -> ArithmeticOp {
        self.op
    }

    pub fn operand(&self) -> f64 {
        self.operand
    }
}

impl Transform for ArithmeticTransform {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn category(&self) -> TransformCategory {
        TransformCategory::Numeric
    }

    fn output(&self) -> TransformOutput {
        TransformOutput::Fixed(CanonicalType::Float)
    }

    fn apply(&self, input: SampleValue) -> Result<SampleValue, EvaluationError> {
        let result = match numeric_value(&input) {
            Some(number) => self.op.eval(number, self.operand),
            None => 0.0,
        };
        Ok(SampleValue::Float(result))
    }
}

fn numeric_value(value: &SampleValue) -> Option<f64> {
    match value {
        SampleValue::Integer(number) => Some(*number as f64),
        SampleValue::Float(number) => Some(*number),
        SampleValue::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        SampleValue::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}
