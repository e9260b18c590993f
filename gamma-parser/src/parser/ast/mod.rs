pub mod binary;
pub mod block;
pub mod call;
pub mod collection;
pub mod expr;
pub mod for_stmt;
pub mod func_def;
pub mod if_stmt;
pub mod literal;
pub mod member;
pub mod stmt;
pub mod unary;

pub use binary::Binary;
pub use block::Block;
pub use call::{Call, Keyword};
pub use collection::{Dict, List, Paren, Tuple};
pub use expr::Expr;
pub use for_stmt::For;
pub use func_def::{FuncDef, Param};
pub use if_stmt::If;
pub use literal::{Ident, LitBool, LitFloat, LitInt, LitNone, LitStr, Literal};
pub use member::{Attribute, Index};
pub use stmt::{Assign, AssignTarget, Program, Return, Stmt};
pub use unary::Unary;
