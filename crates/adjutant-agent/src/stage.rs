// SPDX-FileCopyrightText: 2026 Adjutant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pipeline stages and the transition function between them.
//!
//! The pipeline is a small linear state machine. The only branch point is
//! [`PipelineStage::AnalyzeIntent`]: when routing matched a capability the
//! pipeline detours through tool execution, otherwise it goes straight to
//! response generation. Every path reaches [`PipelineStage::Done`].

use std::fmt;

/// One stage of the message-handling pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// Look up stored facts relevant to the incoming message.
    RetrieveMemory,
    /// Match the message against capability triggers.
    AnalyzeIntent,
    /// Invoke the routed capability action.
    ExecuteTool,
    /// Synthesize grounding and call the model.
    GenerateResponse,
    /// Persist facts extracted from this exchange.
    ExtractMemory,
    /// Terminal stage.
    Done,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::RetrieveMemory => "retrieve_memory",
            PipelineStage::AnalyzeIntent => "analyze_intent",
            PipelineStage::ExecuteTool => "execute_tool",
            PipelineStage::GenerateResponse => "generate_response",
            PipelineStage::ExtractMemory => "extract_memory",
            PipelineStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Next stage after `stage`. `routed` is consulted only at
/// [`PipelineStage::AnalyzeIntent`]; it is ignored everywhere else.
/// [`PipelineStage::Done`] is absorbing.
pub fn advance(stage: PipelineStage, routed: bool) -> PipelineStage {
    match stage {
        PipelineStage::RetrieveMemory => PipelineStage::AnalyzeIntent,
        PipelineStage::AnalyzeIntent if routed => PipelineStage::ExecuteTool,
        PipelineStage::AnalyzeIntent => PipelineStage::GenerateResponse,
        PipelineStage::ExecuteTool => PipelineStage::GenerateResponse,
        PipelineStage::GenerateResponse => PipelineStage::ExtractMemory,
        PipelineStage::ExtractMemory => PipelineStage::Done,
        PipelineStage::Done => PipelineStage::Done,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PipelineStage::*;

    #[test]
    fn transition_table_is_total() {
        let table = [
            (RetrieveMemory, false, AnalyzeIntent),
            (RetrieveMemory, true, AnalyzeIntent),
            (AnalyzeIntent, true, ExecuteTool),
            (AnalyzeIntent, false, GenerateResponse),
            (ExecuteTool, false, GenerateResponse),
            (ExecuteTool, true, GenerateResponse),
            (GenerateResponse, false, ExtractMemory),
            (GenerateResponse, true, ExtractMemory),
            (ExtractMemory, false, Done),
            (ExtractMemory, true, Done),
            (Done, false, Done),
            (Done, true, Done),
        ];
        for (from, routed, to) in table {
            assert_eq!(advance(from, routed), to, "advance({from}, {routed})");
        }
    }

    #[test]
    fn every_start_reaches_done() {
        for routed in [false, true] {
            let mut stage = RetrieveMemory;
            let mut hops = 0;
            while stage != Done {
                stage = advance(stage, routed);
                hops += 1;
                assert!(hops <= 6, "pipeline must terminate");
            }
        }
    }

    #[test]
    fn display_is_snake_case() {
        assert_eq!(RetrieveMemory.to_string(), "retrieve_memory");
        assert_eq!(AnalyzeIntent.to_string(), "analyze_intent");
        assert_eq!(ExecuteTool.to_string(), "execute_tool");
        assert_eq!(GenerateResponse.to_string(), "generate_response");
        assert_eq!(ExtractMemory.to_string(), "extract_memory");
        assert_eq!(Done.to_string(), "done");
    }
}
