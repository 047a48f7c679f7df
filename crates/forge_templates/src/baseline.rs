//! Baseline applications: complete three-file apps produced from a brief
//! when nothing exists yet or the external generator is unavailable.

use serde::{Deserialize, Serialize};

use crate::fileset::SourceFileSet;
use crate::renderer::TemplateRenderer;

/// Which hand-authored baseline to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineKind {
    Calculator,
    Counter,
    Generic,
}

impl BaselineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Calculator => "calculator",
            Self::Counter => "counter",
            Self::Generic => "generic",
        }
    }
}

impl std::fmt::Display for BaselineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders baseline templates.
#[derive(Default)]
pub struct Baseline {
    renderer: TemplateRenderer,
}

impl Baseline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render a complete file set. Only the generic baseline uses `brief`.
    pub fn render(&self, kind: BaselineKind, brief: &str) -> SourceFileSet {
        match kind {
            BaselineKind::Calculator => {
                SourceFileSet::new(CALCULATOR_HTML, CALCULATOR_CSS, CALCULATOR_JS)
            }
            BaselineKind::Counter => SourceFileSet::new(COUNTER_HTML, COUNTER_CSS, COUNTER_JS),
            BaselineKind::Generic => SourceFileSet::new(
                self.generic_markup(brief),
                GENERIC_CSS,
                GENERIC_JS,
            ),
        }
    }

    /// Markup of the generic baseline with the brief echoed into its panel.
    pub fn generic_markup(&self, brief: &str) -> String {
        self.renderer.render_with(GENERIC_HTML, &[("brief", brief)])
    }

    /// Stylesheet used when generated output carries none.
    pub fn basic_stylesheet(&self) -> &'static str {
        BASIC_CSS
    }

    /// Script used when generated output carries none.
    pub fn basic_script(&self) -> &'static str {
        BASIC_JS
    }

    /// Wrap a markup fragment into a complete document.
    pub fn document_shell(&self, content: &str, brief: &str) -> String {
        let title: String = brief.chars().take(50).collect();
        self.renderer.render_with(
            SHELL_HTML,
            &[("title", title.as_str()), ("content", content)],
        )
    }
}

// Calculator

const CALCULATOR_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Calculator App</title>
    <link href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css" rel="stylesheet">
    <link href="style.css" rel="stylesheet">
</head>
<body>
    <div class="calculator">
        <div class="display" id="display">0</div>
        <div class="row">
            <button class="btn btn-light col-3" onclick="clearDisplay()">C</button>
            <button class="btn btn-light col-3" onclick="appendToDisplay('/')">/</button>
            <button class="btn btn-light col-3" onclick="appendToDisplay('*')">×</button>
            <button class="btn btn-light col-3" onclick="appendToDisplay('-')">-</button>
        </div>
        <div class="row">
            <button class="btn btn-secondary col-3" onclick="appendToDisplay('7')">7</button>
            <button class="btn btn-secondary col-3" onclick="appendToDisplay('8')">8</button>
            <button class="btn btn-secondary col-3" onclick="appendToDisplay('9')">9</button>
            <button class="btn btn-light col-3" onclick="appendToDisplay('+')">+</button>
        </div>
        <div class="row">
            <button class="btn btn-secondary col-3" onclick="appendToDisplay('4')">4</button>
            <button class="btn btn-secondary col-3" onclick="appendToDisplay('5')">5</button>
            <button class="btn btn-secondary col-3" onclick="appendToDisplay('6')">6</button>
            <button class="btn btn-success col-3" onclick="calculate()">=</button>
        </div>
        <div class="row">
            <button class="btn btn-secondary col-3" onclick="appendToDisplay('1')">1</button>
            <button class="btn btn-secondary col-3" onclick="appendToDisplay('2')">2</button>
            <button class="btn btn-secondary col-3" onclick="appendToDisplay('3')">3</button>
            <button class="btn btn-secondary col-3" onclick="appendToDisplay('.')">.</button>
        </div>
        <div class="row">
            <button class="btn btn-secondary col-12" onclick="appendToDisplay('0')">0</button>
        </div>
    </div>
    <script src="script.js"></script>
</body>
</html>
"#;

const CALCULATOR_CSS: &str = r#".calculator {
    max-width: 300px;
    margin: 50px auto;
    padding: 20px;
    background: #333;
    border-radius: 10px;
}

.display {
    background: #000;
    color: white;
    text-align: right;
    padding: 10px;
    font-size: 24px;
    margin-bottom: 10px;
    border-radius: 5px;
    overflow-x: auto;
}

.calculator .btn {
    margin: 2px 0;
}
"#;

const CALCULATOR_JS: &str = r#"let currentDisplay = '0';
let shouldResetDisplay = false;

function updateDisplay() {
    document.getElementById('display').textContent = currentDisplay;
}

function appendToDisplay(value) {
    if (currentDisplay === '0' || shouldResetDisplay) {
        currentDisplay = value;
        shouldResetDisplay = false;
    } else {
        currentDisplay += value;
    }
    updateDisplay();
}

function clearDisplay() {
    currentDisplay = '0';
    updateDisplay();
}

function evaluateExpression(expression) {
    if (!/^[0-9+\-*/.() ]+$/.test(expression)) {
        throw new Error('Invalid expression');
    }
    const result = Function('"use strict"; return (' + expression + ');')();
    if (!Number.isFinite(result)) {
        throw new Error('Invalid result');
    }
    return result;
}

function calculate() {
    try {
        currentDisplay = evaluateExpression(currentDisplay).toString();
    } catch (error) {
        currentDisplay = 'Error';
    }
    shouldResetDisplay = true;
    updateDisplay();
}

updateDisplay();
"#;

// Counter

const COUNTER_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Counter App</title>
    <link href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css" rel="stylesheet">
    <link href="style.css" rel="stylesheet">
</head>
<body>
    <div class="counter-container">
        <h1>Counter Application</h1>
        <div class="count-display" id="count">0</div>
        <div>
            <button class="btn btn-danger btn-lg" id="decrement" onclick="decrement()">-1</button>
            <button class="btn btn-warning btn-lg" id="reset" onclick="resetCounter()">Reset</button>
            <button class="btn btn-success btn-lg" id="increment" onclick="increment()">+1</button>
        </div>
        <div class="mt-4">
            <button class="btn btn-info" onclick="incrementBy(5)">+5</button>
            <button class="btn btn-info" onclick="incrementBy(10)">+10</button>
        </div>
    </div>
    <script src="script.js"></script>
</body>
</html>
"#;

const COUNTER_CSS: &str = r#".counter-container {
    text-align: center;
    margin-top: 100px;
}

.count-display {
    font-size: 4rem;
    font-weight: bold;
    margin: 20px 0;
}

.counter-container .btn {
    margin: 5px;
    font-size: 1.2rem;
}

body {
    transition: background-color 0.3s ease;
}
"#;

const COUNTER_JS: &str = r#"let count = 0;

function updateDisplay() {
    document.getElementById('count').textContent = count;
    document.body.style.backgroundColor = count < 0 ? '#ffebee' : count > 0 ? '#e8f5e8' : '#f5f5f5';
}

function increment() {
    count++;
    updateDisplay();
}

function decrement() {
    count--;
    updateDisplay();
}

function resetCounter() {
    count = 0;
    updateDisplay();
}

function incrementBy(value) {
    count += value;
    updateDisplay();
}

updateDisplay();
"#;

// Generic

const GENERIC_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Generated App</title>
    <link href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css" rel="stylesheet">
    <link href="style.css" rel="stylesheet">
</head>
<body>
    <div class="container">
        <h1 class="text-center mb-4">🚀 Generated Application</h1>
        <div class="feature">
            <h3>About This App</h3>
            <p>{{brief}}</p>
        </div>
        <div class="feature">
            <h3>Features</h3>
            <ul>
                <li>Automatically generated</li>
                <li>Responsive design</li>
                <li>Bootstrap 5 styling</li>
                <li>GitHub Pages ready</li>
            </ul>
        </div>
        <div class="text-center mt-4">
            <button class="btn btn-primary" onclick="showMessage()">Click Me!</button>
            <p id="message" class="mt-3 text-success"></p>
        </div>
    </div>
    <script src="script.js"></script>
</body>
</html>
"#;

const GENERIC_CSS: &str = r#"body {
    font-family: Arial, sans-serif;
    margin: 0;
    padding: 20px;
    background: #f5f5f5;
}

.container {
    max-width: 800px;
    margin: 20px auto 0 auto;
    background: white;
    padding: 30px;
    border-radius: 10px;
    box-shadow: 0 2px 10px rgba(0, 0, 0, 0.1);
}

.feature {
    margin: 20px 0;
    padding: 15px;
    background: #f8f9fa;
    border-radius: 5px;
    border-left: 4px solid #007bff;
}

.btn-primary {
    background: linear-gradient(45deg, #007bff, #0056b3);
    border: none;
    padding: 10px 20px;
    border-radius: 25px;
}
"#;

const GENERIC_JS: &str = r#"const messages = [
    "Hello! This app is working!",
    "GitHub integration successful!",
    "Auto-deployment is awesome!",
    "You clicked the button! 🎉"
];

function showMessage() {
    const randomMessage = messages[Math.floor(Math.random() * messages.length)];
    document.getElementById('message').textContent = randomMessage;
}

console.log("Application loaded successfully!");
"#;

// Cleanup defaults for generated output

const BASIC_CSS: &str = r#"/* Basic responsive styles */
.container { max-width: 800px; margin: 0 auto; }
@media (max-width: 768px) {
    .container { padding: 10px; }
}
.feature-card {
    margin: 15px 0;
    padding: 20px;
    background: #f8f9fa;
    border-radius: 8px;
    border-left: 4px solid #007bff;
}
"#;

const BASIC_JS: &str = r#"// Basic application functionality
console.log("Application initialized");

function showNotification(message, type = 'info') {
    console.log(`${type.toUpperCase()}: ${message}`);
}
"#;

const SHELL_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Generated App: {{title}}</title>
    <link href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css" rel="stylesheet">
    <link href="style.css" rel="stylesheet">
</head>
<body>
    <div class="container">
        <h1 class="text-center mb-4">Generated Application</h1>
        {{content}}
    </div>
    <script src="https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/js/bootstrap.bundle.min.js"></script>
    <script src="script.js"></script>
</body>
</html>
"#;
