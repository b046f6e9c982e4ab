// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Pythia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pythia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Built-in demo: a two-file Go program with a canned answer for every query mode.

use crate::backend::MemoryBackend;
use crate::model::Mode;

pub const DEMO_FILE: &str = "main.go";

const MAIN_GO: &str = r#"package main

import (
	"fmt"
	"os"
)

func main() {
	name := "world"
	if len(os.Args) > 1 {
		name = os.Args[1]
	}
	msgs := make(chan string)
	go greet(name, msgs)
	fmt.Println(<-msgs)
}
"#;

const GREET_GO: &str = r#"package main

import "fmt"

// Greeter formats greetings.
type Greeter interface {
	Greet(name string) string
}

type plain struct{}

func (plain) Greet(name string) string {
	return fmt.Sprintf("hello, %s", name)
}

func greet(name string, out chan<- string) {
	var g Greeter = plain{}
	out <- g.Greet(name)
}
"#;

fn canned_response(mode: Mode) -> &'static str {
    match mode {
        Mode::Describe => {
            "main.go:14.5-14.9: reference to func greet(name string, out chan<- string)\n\
             greet.go:16:6: defined here"
        }
        Mode::Callees => {
            "main.go:14.2-14.21: this go statement dispatches to:\n\
             greet.go:16:6: \tmain.greet"
        }
        Mode::Callers => {
            "greet.go:16.6-16.10: main.greet is called from these 1 sites:\n\
             main.go:14:2: \tconcurrent static function call from main.main"
        }
        Mode::Callgraph => {
            "-: Below is a call graph of the program.\n\
             -: Each line is a function; indentation shows callees.\n\
             main.go:8:6: main.main\n\
             greet.go:16:6: \tmain.greet\n\
             greet.go:12:14: \t\t(main.plain).Greet"
        }
        Mode::Callstack => {
            "greet.go:12.14-12.19: Found a call path from root to (main.plain).Greet\n\
             greet.go:12:14: (main.plain).Greet\n\
             greet.go:18:16: dynamic method call from main.greet\n\
             main.go:14:2: concurrent static function call from main.main"
        }
        Mode::Freevars => {
            "-: Free identifiers:\n\
             greet.go:17:6: var g main.Greeter\n\
             greet.go:16:12: var name string"
        }
        Mode::Implements => {
            "greet.go:10.6-10.11: struct type main.plain\n\
             greet.go:6:6: \timplements main.Greeter"
        }
        Mode::Peers => {
            "main.go:15.14-15.19: This channel of type chan string may be:\n\
             main.go:13:10: \tallocated here\n\
             greet.go:18:2: \tsent to, here\n\
             main.go:15:14: \treceived from, here"
        }
        Mode::Referrers => {
            "main.go:9.2-9.6: references to var name string\n\
             main.go:11:3: name = os.Args[1]\n\
             main.go:14:11: go greet(name, msgs)"
        }
    }
}

/// An in-memory oracle serving the demo program.
pub fn demo_backend() -> MemoryBackend {
    Mode::ALL.into_iter().fold(
        MemoryBackend::new()
            .with_file(DEMO_FILE, MAIN_GO)
            .with_file("greet.go", GREET_GO),
        |backend, mode| backend.with_response(mode, canned_response(mode)),
    )
}
