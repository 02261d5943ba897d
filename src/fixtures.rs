//! Stream fixtures shared by the unit tests

/// One page, two inputs, nested boxes and a kern
pub const FIXTURE_BASIC: &str = "SyncTeX Version:1
Input:1:./main.tex
Input:2:./chapter.tex
Output:main.pdf
Magnification:1000
Unit:1
X Offset:0
Y Offset:0
Content:
!100
{1
[1,1:0,0:34611850,49825690,0
(1,3:4736286,3670016:25137278,655360,0
x1,3:4736286,3670016
h1,3:4736286,3670016:3078103,655360,0
)
(2,10:4736286,5242880:12000000,655360,0
h2,10:4736286,5242880:5000000,655360,0
)
]
}1
Postamble:
Count:6
";

pub const FIXTURE_MULTI_PAGE: &str = "SyncTeX Version:1
Input:1:./main.tex
Output:main.pdf
Magnification:1000
Unit:1
X Offset:0
Y Offset:0
Content:
{1
[1,1:0,0:34611850,49825690,0
(1,5:4736286,3670016:25137278,655360,0
)
]
}1
{2
[1,1:0,0:34611850,49825690,0
(1,15:4736286,3670016:25137278,655360,0
)
]
}2
Postamble:
Count:4
";

/// Column numbers (format 1.2+)
pub const FIXTURE_WITH_COLUMNS: &str = "SyncTeX Version:1
Input:1:./main.tex
Output:main.pdf
Magnification:1000
Unit:1
X Offset:0
Y Offset:0
Content:
{1
(1,7,5:4736286,3670016:25137278,655360,0
k1,7,5:4736286,3670016:100000
$1,7,10:6000000,3670016
)
}1
Postamble:
Count:3
";

pub const FIXTURE_SCALED: &str = "SyncTeX Version:1
Input:1:./main.tex
Output:main.pdf
Magnification:2000
Unit:2
X Offset:0
Y Offset:0
Content:
{1
(1,3:4736286,3670016:25137278,655360,0
)
}1
Postamble:
Count:1
";

/// A wrapped paragraph line: the hbox is tagged with the paragraph's first
/// line (14) while the glue and kerns inside carry line 16.
pub const FIXTURE_PARAGRAPH: &str = "SyncTeX Version:1
Input:1:./main.tex
Output:main.pdf
Magnification:1000
Unit:1
X Offset:0
Y Offset:0
Content:
{1
[1,1:0,0:34611850,49825690,0
(1,14:4736286,23068672:22609920,655360,196608
g1,16:10100000,23068672
k1,16:12800000,23068672
g1,16:13000000,23068672
k1,16:14300000,23068672
k1,16:15300000,23068672
)
]
}1
Postamble:
Count:7
";

/// Two list items: a vbox spanning both (tagged line 5) plus one hbox per
/// item on lines 4 and 5.
pub const FIXTURE_ITEMIZE: &str = "SyncTeX Version:1
Input:1:./main.tex
Output:main.pdf
Magnification:1000
Unit:1
X Offset:0
Y Offset:0
Content:
{1
[1,1:0,0:34611850,49825690,0
[1,5:4736286,3670016:25137278,1966080,0
(1,4:4736286,3014656:25137278,655360,0
h1,4:4736286,3014656:10000000,655360,0
)
(1,5:4736286,3670016:25137278,655360,0
h1,5:4736286,3670016:12000000,655360,0
)
]
]
}1
Postamble:
Count:6
";

/// Three consecutive source lines typeset top to bottom, with gaps in the
/// source (lines 20, 21, 22 and 30 have no records).
pub const FIXTURE_LINES: &str = "SyncTeX Version:1
Input:1:./main.tex
Magnification:1000
Unit:1
X Offset:0
Y Offset:0
Content:
{1
[1,1:0,0:34611850,49825690,0
(1,17:4736286,3670016:25137278,655360,196608
h1,17:4736286,3670016:9000000,655360,196608
)
(1,18:4736286,4456448:25137278,655360,196608
h1,18:4736286,4456448:11000000,655360,196608
)
(1,19:4736286,5242880:25137278,655360,196608
h1,19:4736286,5242880:7000000,655360,196608
)
(1,26:4736286,9437184:25137278,655360,196608
h1,26:4736286,9437184:8000000,655360,196608
)
]
}1
Postamble:
Count:9
";

pub const FIXTURE_EMPTY: &str = "SyncTeX Version:1
Input:1:./main.tex
Output:main.pdf
Magnification:1000
Unit:1
X Offset:0
Y Offset:0
Content:
Postamble:
Count:0
";

/// A page with `rows` text lines of `words` void boxes each, separated by
/// glue, all inside one vbox. Line `n` of the source is typeset on row `n-1`.
pub fn synthetic_page(rows: u32, words: u32) -> String {
    let mut out = String::from(
        "SyncTeX Version:1\nInput:1:./main.tex\nMagnification:1000\nUnit:1\n\
         X Offset:0\nY Offset:0\nContent:\n{1\n",
    );
    let word_width: i64 = 1_500_000;
    let gap: i64 = 200_000;
    let row_width = i64::from(words) * (word_width + gap);
    out.push_str(&format!("[1,1:0,0:{},{},0\n", row_width, i64::from(rows + 2) * 786_432));
    for row in 0..rows {
        let line = row + 1;
        let v = i64::from(row + 1) * 786_432;
        out.push_str(&format!("(1,{}:0,{}:{},655360,196608\n", line, v, row_width));
        for word in 0..words {
            let h = i64::from(word) * (word_width + gap);
            out.push_str(&format!("h1,{}:{},{}:{},655360,196608\n", line, h, v, word_width));
            out.push_str(&format!("g1,{}:{},{}\n", line, h + word_width + gap, v));
        }
        out.push_str(")\n");
    }
    out.push_str("]\n}1\nPostamble:\n");
    out
}

/// Scaled points to page points at unit 1, magnification 1000
pub const SP_TO_PDF: f64 = (1.0 / 65536.0) * (72.0 / 72.27);
