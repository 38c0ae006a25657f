//! # agent-core
//!
//! Provider-agnostic agent loop with a string-in/string-out tool system.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Agent                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │  ReAct text │  │    Tools    │  │   LlmProvider       │  │
//! │  │    loop     │──│   Registry  │──│   (Strategy)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The model selects tools by writing `Action:` / `Action Input:` lines and
//! stops with `Final Answer:`. Tools only ever see one input string and only
//! ever return one output string.

pub mod error;
pub mod message;
pub mod provider;
pub mod reasoning;
pub mod tool;

pub use error::{AgentError, Result};
pub use message::{Conversation, Message, Role};
pub use provider::{Completion, GenerationOptions, LlmProvider};
pub use reasoning::{Agent, AgentBuilder, AgentConfig};
pub use tool::{Tool, ToolCall, ToolRegistry, ToolResult, ToolSchema};
