/*!

This is the long-form manual for `reweighted_voting` and `rrvtab`.

## The tally

Every voter gives every candidate a score between 0 and a maximum score
(9 by default). Winners are elected one at a time:

1. the total of each candidate is the sum, over all the ballots, of the score
   divided by the inverse weight of the ballot. All the ballots start with an
   inverse weight of 1.
2. the candidate with the greatest total who is not elected yet wins the round.
   If several candidates have exactly the same total, the one that comes first
   in the candidate list wins.
3. every ballot adds `score for the winner / maximum score` to its inverse
   weight. A ballot that gave the maximum score to the winner counts half as
   much in the next round, a ballot that gave 0 keeps its weight.

This repeats until all the seats are filled. All the computations are done
with exact fractions: the totals printed with three decimals are rounded for
display only.

## Input formats

The following formats are supported:
* `csv` Comma Separated Values, from a file or from the standard input
* `xlsx` Excel spreadsheets

### csv

One row per voter, one column per candidate:

```text
timestamp,voter,Rocky,Kitty,Cassie,Zoe,Susana
2024-01-04,v1,9,0,3,5,
2024-01-04,v2,0,7/2,9,9,1.5
```

The first row is a header holding the names of the candidates. The scores
start at the third column by default. A score may be an integer, a fraction
(`7/2`) or a decimal number (`1.5`). An empty cell is a score of 0.

See the [Configuration section](#configuration) on controling the optional rows and columns.

### xlsx

The same table, in the first worksheet of an Excel file (or the worksheet
given with `--excel-worksheet-name`).

## Configuration

`rrvtab` accepts a configuration file in JSON:

```json
{
  "outputSettings": { "contestName": "Core election" },
  "cvrFileSources": [
    { "provider": "csv", "filePath": "ballots.csv",
      "firstVoteColumnIndex": 3, "firstVoteRowIndex": 2 }
  ],
  "candidates": [ { "name": "Rocky" }, { "name": "Kitty" } ],
  "rules": { "numberOfWinners": 4, "maxScore": 9 }
}
```

 - `firstVoteColumnIndex` (number, string or Excel column letter, optional, default 3):
 the first column holding scores. Columns are numbered from 1.
 - `firstVoteRowIndex` (number or string, optional, default 2): the first row holding
 a ballot. When it is greater than 1, the row just above is the header.
 - `idColumnIndex` (optional): a column holding an identifier for each ballot.
 - `excelWorksheetName` (string, optional): for Excel-based inputs, the name of
 the worksheet in Excel.
 - `candidates` (optional): the names of the candidates, in column order. If not
 provided, the names are read from the header of the first file.

The options given on the command line take precedence over the configuration file.
*/
